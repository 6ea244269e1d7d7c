use dialoguer::{Input, theme::ColorfulTheme};
use log::debug;
use thiserror::Error;

const ENV_PREFIX: &'static str = "KINSTA_";

/// Parameter name of the Kinsta API key
pub const API_KEY_PARAM: &'static str = "api-key";
pub const COMPANY_PARAM: &'static str = "company";

/// Older plugin releases read the key from this variable
const LEGACY_API_KEY_VAR: &'static str = "KINSTA_API_ACCESS_TOKEN";

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("{0} is required.")]
    Required(String),
    #[error("Input error: {0}")]
    Input(#[from] dialoguer::Error)
}

type Result<T> = std::result::Result<T, CredentialError>;

/// Source of interactive answers for parameters that were not given
pub trait InputProvider {
    fn ask(&self, prompt: &str) -> Result<String>;
}

/// Prompts on the terminal
pub struct TerminalInput;

impl InputProvider for TerminalInput {
    fn ask(&self, prompt: &str) -> Result<String> {
        // empty answers are allowed here so the resolver can report them
        Ok(Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    }
}

/// `api-key` -> `KINSTA_API_KEY`
pub fn env_var_name(param: &str) -> String {
    format!("{}{}", ENV_PREFIX, param.replace('-', "_").to_uppercase())
}

pub struct Resolver<'a, E> {
    input: &'a dyn InputProvider,
    env: E
}

impl<'a> Resolver<'a, fn(&str) -> Option<String>> {
    /// resolver backed by the process environment
    pub fn new(input: &'a dyn InputProvider) -> Self {
        Self::with_env(input, process_env)
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl<'a, E: Fn(&str) -> Option<String>> Resolver<'a, E> {
    pub fn with_env(input: &'a dyn InputProvider, env: E) -> Self {
        Self { input, env }
    }

    fn lookup(&self, name: &str) -> Option<String> {
        (self.env)(name).filter(|v| !v.is_empty())
    }

    /// Resolve a parameter from its flag, then the environment, then a prompt
    pub fn resolve(&self, param: &str, flag: Option<&str>) -> Result<String> {
        if let Some(value) = flag.filter(|v| !v.is_empty()) {
            debug!("Using {} from command line", param);
            return Ok(value.to_string());
        }

        let var = env_var_name(param);
        if let Some(value) = self.lookup(&var) {
            debug!("Using {} from {}", param, var);
            return Ok(value);
        }

        if param == API_KEY_PARAM {
            if let Some(value) = self.lookup(LEGACY_API_KEY_VAR) {
                debug!("Using {} from {}", param, LEGACY_API_KEY_VAR);
                return Ok(value);
            }
        }

        let value = self.input.ask(&format!("Enter {}:", param))?;
        if value.is_empty() {
            Err(CredentialError::Required(param.to_string()))
        } else {
            Ok(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::{cell::RefCell, collections::HashMap, io};

    /// records prompts and answers with a canned value
    struct ScriptedInput {
        answer: Option<&'static str>,
        prompts: RefCell<Vec<String>>
    }

    impl ScriptedInput {
        fn answering(answer: &'static str) -> Self {
            Self { answer: Some(answer), prompts: RefCell::new(vec![]) }
        }

        fn failing() -> Self {
            Self { answer: None, prompts: RefCell::new(vec![]) }
        }
    }

    impl InputProvider for ScriptedInput {
        fn ask(&self, prompt: &str) -> Result<String> {
            self.prompts.borrow_mut().push(prompt.to_string());
            match self.answer {
                Some(a) => Ok(a.to_string()),
                None => Err(dialoguer::Error::IO(io::Error::new(io::ErrorKind::NotConnected, "not a terminal")).into())
            }
        }
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_var_names() {
        assert_eq!(env_var_name("api-key"), "KINSTA_API_KEY");
        assert_eq!(env_var_name("company"), "KINSTA_COMPANY");
    }

    #[test]
    fn flag_wins() {
        let input = ScriptedInput::answering("prompted");
        let resolver = Resolver::with_env(&input, env_of(&[("KINSTA_API_KEY", "from-env")]));
        assert_eq!(resolver.resolve("api-key", Some("from-flag")).unwrap(), "from-flag");
        assert!(input.prompts.borrow().is_empty());
    }

    #[test]
    fn env_wins_over_prompt() {
        let input = ScriptedInput::answering("prompted");
        let resolver = Resolver::with_env(&input, env_of(&[("KINSTA_API_KEY", "X")]));
        assert_eq!(resolver.resolve("api-key", None).unwrap(), "X");
        // empty flag counts as not given
        assert_eq!(resolver.resolve("api-key", Some("")).unwrap(), "X");
        assert!(input.prompts.borrow().is_empty());
    }

    #[test]
    fn legacy_token_var() {
        let input = ScriptedInput::answering("prompted");
        let resolver = Resolver::with_env(&input, env_of(&[("KINSTA_API_ACCESS_TOKEN", "old")]));
        assert_eq!(resolver.resolve(API_KEY_PARAM, None).unwrap(), "old");

        let resolver = Resolver::with_env(&input, env_of(&[
            ("KINSTA_API_ACCESS_TOKEN", "old"),
            ("KINSTA_API_KEY", "new")
        ]));
        assert_eq!(resolver.resolve("api-key", None).unwrap(), "new");
        // only applies to the api key
        assert_eq!(resolver.resolve("company", None).unwrap(), "prompted");
    }

    #[test]
    fn prompts_when_unset() {
        let input = ScriptedInput::answering("42");
        let resolver = Resolver::with_env(&input, env_of(&[("KINSTA_COMPANY", "")]));
        assert_eq!(resolver.resolve("company", None).unwrap(), "42");
        assert_eq!(*input.prompts.borrow(), vec!["Enter company:".to_string()]);
    }

    #[test]
    fn empty_answer_is_required_error() {
        let input = ScriptedInput::answering("");
        let resolver = Resolver::with_env(&input, env_of(&[]));
        let err = resolver.resolve("api-key", None).unwrap_err();
        assert!(matches!(err, CredentialError::Required(ref p) if p == "api-key"));
        assert_eq!(err.to_string(), "api-key is required.");
    }

    #[test]
    fn prompt_failure_propagates() {
        let input = ScriptedInput::failing();
        let resolver = Resolver::with_env(&input, env_of(&[]));
        assert!(matches!(
            resolver.resolve("company", None),
            Err(CredentialError::Input(_))
        ));
    }
}

use serde::{Deserialize, Deserializer};

// every field accepts `null` as its empty value

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SiteLabel {
    #[serde(deserialize_with = "number_or_string")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Site {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub site_labels: Vec<SiteLabel>
}

impl Site {
    /// label names in API order, comma separated
    pub fn label_names(&self) -> String {
        self.site_labels.iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Company {
    #[serde(deserialize_with = "null_as_default")]
    pub sites: Vec<Site>
}

/// Response of `GET /sites`
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct SitesList {
    #[serde(deserialize_with = "null_as_default")]
    pub company: Company
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// label ids come back as either JSON numbers or numeric strings
fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(serde_json::Number),
        String(String)
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Number(n)) => n.to_string(),
        Some(Id::String(s)) => s,
        None => String::new()
    })
}

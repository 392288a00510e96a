use serde::{Deserialize, Serialize};

/// The locally persisted user identity. Serialized with the same camelCase
/// keys the mobile client has always stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub order_statuses_notifs: bool,
    #[serde(default)]
    pub password_changes_notifs: bool,
    #[serde(default)]
    pub special_offers_notifs: bool,
    #[serde(default)]
    pub newsletter_notifs: bool,
}

impl Profile {
    /// Placeholder shown when no avatar is set.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        let mut profile = Profile {
            first_name: "Tilly".to_string(),
            last_name: "Doe".to_string(),
            ..Default::default()
        };
        assert_eq!(profile.initials(), "TD");

        profile.last_name.clear();
        assert_eq!(profile.initials(), "T");

        assert_eq!(Profile::default().initials(), "");
    }

    #[test]
    fn test_camel_case_keys() {
        let profile = Profile {
            first_name: "Tilly".to_string(),
            newsletter_notifs: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["firstName"], "Tilly");
        assert_eq!(json["newsletterNotifs"], true);
        assert!(json["avatar"].is_null());
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let profile: Profile =
            serde_json::from_str(r#"{"firstName":"Tilly","email":"tilly@example.com"}"#).unwrap();
        assert_eq!(profile.first_name, "Tilly");
        assert_eq!(profile.avatar, None);
        assert!(!profile.order_statuses_notifs);
    }
}

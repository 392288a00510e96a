use serde::{Deserialize, Serialize};

/// One menu entry. `name` is the key the local store merges on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
}

impl Dish {
    /// Resolves the image fragment against the remote image directory.
    pub fn image_url(&self, base: &str) -> String {
        format!("{}/{}?raw=true", base.trim_end_matches('/'), self.image)
    }
}

/// Body of the remote menu document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuPayload {
    pub menu: Vec<Dish>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote_document() {
        let json = r#"{"menu":[
            {"name":"Greek Salad","price":12.99,"description":"Crispy lettuce","image":"greekSalad.jpg","category":"starters"},
            {"name":"Lemon Dessert","price":6.99,"description":"Cake","image":"lemonDessert.jpg","category":"desserts"}
        ]}"#;
        let payload: MenuPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.menu.len(), 2);
        assert_eq!(payload.menu[0].name, "Greek Salad");
        assert_eq!(payload.menu[1].category, "desserts");
        assert!((payload.menu[0].price - 12.99).abs() < f64::EPSILON);
    }

    #[test]
    fn test_image_url_normalizes_trailing_slash() {
        let dish = Dish {
            name: "Bruschetta".to_string(),
            description: String::new(),
            price: 7.99,
            image: "bruschetta.jpg".to_string(),
            category: "starters".to_string(),
        };
        assert_eq!(
            dish.image_url("https://img.example/images/"),
            "https://img.example/images/bruschetta.jpg?raw=true"
        );
        assert_eq!(
            dish.image_url("https://img.example/images"),
            "https://img.example/images/bruschetta.jpg?raw=true"
        );
    }
}

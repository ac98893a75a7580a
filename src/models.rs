use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Keys every settings payload served by the API must carry.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "brand_name",
    "brand_slug",
    "theme_color",
    "hero_title",
    "plan_price",
];

/// Landing page configuration of a single brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandSettings {
    pub brand_name: String,
    pub brand_slug: String,
    pub theme_color: String,
    pub hero_title: String,
    pub plan_price: f64,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub hero_description: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub access_title: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub access_description: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub access_image: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub plan_title: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub plan_benefits: Vec<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<Review>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    // Anything else the service sends back, kept so a fetched object can be saved again as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub name: String,
    pub text: String,
    pub rating: f64,
}

// Optional keys sit outside the response contract: null or an unexpected shape reads as unset.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Body of `POST /landingpage/settings`.
#[derive(Debug, Serialize)]
pub struct SettingsEnvelope<'a> {
    pub settings: &'a BrandSettings,
}

/// What a successful save returned. The service may echo the stored settings back.
#[derive(Debug, Clone, Serialize)]
pub struct SaveResponse {
    pub status: String,
    pub settings: Option<BrandSettings>,
}

/// Outcome of one check, appended to the run log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub details: String,
}

impl BrandSettings {
    /// The payload the save/retrieve cycle writes for a freshly generated slug.
    pub fn sample(brand_slug: &str) -> Self {
        Self {
            brand_name: "Test Fitness Brand".to_string(),
            brand_slug: brand_slug.to_string(),
            theme_color: "#FF5733".to_string(),
            hero_title: "Test Hero Title".to_string(),
            plan_price: 39.99,
            about: Some("This is a test fitness brand for API testing.".to_string()),
            hero_description: Some("Test hero description for API testing.".to_string()),
            hero_image: Some("https://example.com/test-hero.jpg".to_string()),
            access_title: Some("Test Access Title".to_string()),
            access_description: Some("Test access description.".to_string()),
            access_image: Some("https://example.com/test-access.jpg".to_string()),
            plan_title: Some("Test Plan".to_string()),
            plan_benefits: vec![
                "Test benefit 1".to_string(),
                "Test benefit 2".to_string(),
                "Test benefit 3".to_string(),
            ],
            reviews: vec![Review {
                name: "Test User".to_string(),
                text: "Great test program!".to_string(),
                rating: 5.0,
            }],
            logo: None,
            currency: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    /// First of the round-trip key fields where `self` (sent) and `other` (received) differ.
    pub fn first_mismatch(&self, other: &BrandSettings) -> Option<FieldMismatch> {
        let text_fields = [
            ("brand_name", &self.brand_name, &other.brand_name),
            ("theme_color", &self.theme_color, &other.theme_color),
            ("hero_title", &self.hero_title, &other.hero_title),
        ];
        for (field, saved, got) in text_fields {
            if saved != got {
                return Some(FieldMismatch {
                    field,
                    saved: saved.clone(),
                    got: got.clone(),
                });
            }
        }
        if self.plan_price != other.plan_price {
            return Some(FieldMismatch {
                field: "plan_price",
                saved: self.plan_price.to_string(),
                got: other.plan_price.to_string(),
            });
        }
        None
    }
}

/// Which required keys are absent from a raw settings object, in declaration order.
pub fn missing_required_fields(settings: &Map<String, Value>) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|field| !settings.contains_key(**field))
        .map(|field| field.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMismatch {
    pub field: &'static str,
    pub saved: String,
    pub got: String,
}

use serde::Deserialize;

/// Body of `PUT /users/{username}`: `{"dateOfBirth": "YYYY-MM-DD"}`.
/// The date stays a raw string here so format errors are reported by our
/// validation instead of the deserializer.
#[derive(Debug, Deserialize)]
pub struct PutBirthdayIn {
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: String,
}

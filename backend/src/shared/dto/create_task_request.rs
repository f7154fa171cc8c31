use serde::{
    de::{value::StrDeserializer, IntoDeserializer},
    Deserialize, Deserializer,
};

use crate::task_status::TaskStatus;

#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_status")]
    pub status: Option<TaskStatus>,
}

// `""` and `null` both fall back to the default status on create.
fn blank_status<'de, D>(deserializer: D) -> Result<Option<TaskStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => {
            let raw: StrDeserializer<'_, D::Error> = raw.into_deserializer();
            TaskStatus::deserialize(raw).map(Some)
        }
    }
}

use serde::{Deserialize, Serialize};

/// Body accepted by the create, full update and partial update endpoints.
///
/// Every field defaults to an empty string. `type` is kept as the raw text so
/// the service decides whether it is valid (and, on a partial update, whether a
/// blank value means "keep the stored one"). Server-owned fields such as `id`,
/// `status` or `file_id` are ignored if a client sends them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub src_url: String,
    #[serde(default)]
    pub dst_url: String,
    #[serde(default, rename = "type")]
    pub job_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_blank() {
        let req: JobRequest = serde_json::from_str(r#"{"src_url":"file:///tmp/a.bin"}"#).unwrap();
        assert_eq!(req.src_url, "file:///tmp/a.bin");
        assert!(req.name.is_empty());
        assert!(req.job_type.is_empty());
    }

    #[test]
    fn server_owned_fields_are_ignored() {
        let req: JobRequest = serde_json::from_str(
            r#"{"id":"x","status":"Finished","type":"Create","src_url":"a"}"#,
        )
        .unwrap();
        assert_eq!(req.job_type, "Create");
    }
}

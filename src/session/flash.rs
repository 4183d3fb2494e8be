use serde::{Deserialize, Serialize};

/// One-time notices, stored in the session until the next render.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    #[serde(default)]
    pub success: Vec<String>,
    #[serde(default)]
    pub error: Vec<String>,
}

impl Flash {
    pub fn is_empty(&self) -> bool {
        self.success.is_empty() && self.error.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_partial_payloads() {
        let flash: Flash = serde_json::from_str(r#"{"error":["Listing not found"]}"#).unwrap();
        assert!(flash.success.is_empty());
        assert_eq!(flash.error, vec!["Listing not found"]);
        assert!(!flash.is_empty());
        assert!(Flash::default().is_empty());
    }
}

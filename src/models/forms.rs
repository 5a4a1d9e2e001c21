use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

// Feedback and redirect target carried in the query string of the auth pages
#[derive(Debug, Deserialize, Default)]
pub struct AuthQuery {
    pub error: Option<String>,
    pub message: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AddTimeRequest {
    #[serde(default, alias = "activity")]
    pub atividade: Option<String>,
    #[serde(default, alias = "hours")]
    pub tempo_horas: f64,
}

#[derive(Debug, Deserialize, Default)]
pub struct ActivityNameRequest {
    #[serde(default, alias = "name")]
    pub nome: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ActivityRequest {
    #[serde(default, alias = "activity")]
    pub atividade: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_time_request_accepts_both_field_names() {
        let original: AddTimeRequest =
            serde_json::from_str(r#"{"atividade": "Reading", "tempo_horas": 1.5}"#).unwrap();
        assert_eq!(original.atividade.as_deref(), Some("Reading"));
        assert_eq!(original.tempo_horas, 1.5);

        let english: AddTimeRequest =
            serde_json::from_str(r#"{"activity": "Reading", "hours": 2}"#).unwrap();
        assert_eq!(english.atividade.as_deref(), Some("Reading"));
        assert_eq!(english.tempo_horas, 2.0);
    }

    #[test]
    fn test_add_time_request_defaults_hours_to_zero() {
        let request: AddTimeRequest = serde_json::from_str(r#"{"atividade": "Reading"}"#).unwrap();
        assert_eq!(request.tempo_horas, 0.0);
    }

    #[test]
    fn test_missing_name_deserializes_as_none() {
        let request: ActivityNameRequest = serde_json::from_str("{}").unwrap();
        assert!(request.nome.is_none());
    }
}

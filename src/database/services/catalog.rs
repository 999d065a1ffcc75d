use super::super::types::{Barber, Service};
use super::DatabaseService;
use super::StoreError;

impl DatabaseService {
    pub async fn get_services(&self) -> Result<Vec<Service>, StoreError> {
        let request = self.client.from("services").select("*").order("id");
        self.fetch_rows("services", request).await
    }

    pub async fn get_barbers(&self) -> Result<Vec<Barber>, StoreError> {
        let request = self.client.from("barbers").select("*").order("id");
        self.fetch_rows("barbers", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_get_services_ordered_by_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/services")
            .match_query(Matcher::UrlEncoded("order".into(), "id".into()))
            .with_status(200)
            .with_body(
                r#"[{"id":1,"name":"Haircut","price":35.0,"duration_minutes":30},
                    {"id":2,"name":"Beard","price":25.5,"duration_minutes":45}]"#,
            )
            .create_async()
            .await;

        let db = DatabaseService::with_credentials(&server.url(), "test-key");
        let services = db.get_services().await.unwrap();

        assert_eq!(services.len(), 2);
        assert_eq!(services[1].duration_minutes, 45);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_barbers_with_missing_shifts() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/barbers")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"[{"id":1,"name":"Kendy","morning_shift":"08:00-12:00","afternoon_shift":null,"day_off":"Segunda-feira"},
                    {"id":2,"name":"Rafael"}]"#,
            )
            .create_async()
            .await;

        let db = DatabaseService::with_credentials(&server.url(), "test-key");
        let barbers = db.get_barbers().await.unwrap();

        assert_eq!(barbers[0].morning_shift.as_deref(), Some("08:00-12:00"));
        assert!(barbers[1].morning_shift.is_none());
        assert!(barbers[1].day_off.is_none());
    }

    #[tokio::test]
    async fn test_get_barbers_transport_failure() {
        // Nothing listens on port 9 locally
        let db = DatabaseService::with_credentials("http://127.0.0.1:9", "test-key");
        let result = db.get_barbers().await;

        assert!(matches!(result, Err(StoreError::TransportFailure(_))));
    }
}

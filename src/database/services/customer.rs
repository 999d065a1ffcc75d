use super::super::types::{Customer, NewCustomer};
use super::DatabaseService;
use super::StoreError;
use tracing::info;

impl DatabaseService {
    // Find customer by the 11 CPF digits
    pub async fn get_customer_by_cpf(&self, cpf: &str) -> Result<Customer, StoreError> {
        let request = self.client.from("customers").select("*").eq("cpf", cpf);

        let customers: Vec<Customer> = self.fetch_rows("customers", request).await?;
        customers.into_iter().next().ok_or(StoreError::NotFound)
    }

    pub async fn insert_customer(&self, customer: &NewCustomer) -> Result<Customer, StoreError> {
        let body =
            serde_json::to_string(customer).map_err(|e| StoreError::DecodeError(e.to_string()))?;
        let request = self.client.from("customers").insert(body);

        let created: Vec<Customer> = self.fetch_rows("customers", request).await?;
        let customer = created.into_iter().next().ok_or_else(|| {
            StoreError::DecodeError("No customer returned from insert".to_string())
        })?;
        info!(customer_id = customer.id, "Customer registered");
        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_get_customer_by_cpf_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/customers")
            .match_query(Matcher::UrlEncoded("cpf".into(), "eq.52998224725".into()))
            .match_header("apikey", "test-key")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":7,"name":"Maria Silva","cpf":"52998224725","phone":"5563999887766"}]"#)
            .create_async()
            .await;

        let db = DatabaseService::with_credentials(&server.url(), "test-key");
        let customer = db.get_customer_by_cpf("52998224725").await.unwrap();

        assert_eq!(customer.id, 7);
        assert_eq!(customer.name, "Maria Silva");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_customer_by_cpf_empty_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/customers")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let db = DatabaseService::with_credentials(&server.url(), "test-key");
        let result = db.get_customer_by_cpf("11111111111").await;

        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_get_customer_by_cpf_server_error_is_not_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/customers")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"message":"boom"}"#)
            .create_async()
            .await;

        let db = DatabaseService::with_credentials(&server.url(), "test-key");
        let result = db.get_customer_by_cpf("11111111111").await;

        assert!(matches!(
            result,
            Err(StoreError::StatusError { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_insert_customer_returns_created_row() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/customers")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "Maria Silva",
                "cpf": "52998224725",
                "phone": "5563999887766"
            })))
            .with_status(201)
            .with_body(r#"[{"id":12,"name":"Maria Silva","cpf":"52998224725","phone":"5563999887766"}]"#)
            .create_async()
            .await;

        let db = DatabaseService::with_credentials(&server.url(), "test-key");
        let customer = db
            .insert_customer(&NewCustomer {
                name: "Maria Silva".to_string(),
                cpf: "52998224725".to_string(),
                phone: "5563999887766".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(customer.id, 12);
        mock.assert_async().await;
    }
}

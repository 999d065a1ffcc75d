use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub cpf: String,
    pub phone: Option<String>,
}

// Insert payload - `cpf` holds the bare 11 digits
#[derive(Debug, Serialize, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub cpf: String,
    pub phone: String,
}

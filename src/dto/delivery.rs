use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, ProofOfDelivery};

#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkDeliveredRequest {
    pub photo_path: Option<String>,
    pub signature_path: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelDeliveryRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignCourierRequest {
    pub courier_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeliveredResponse {
    pub order: Order,
    pub proof: ProofOfDelivery,
}

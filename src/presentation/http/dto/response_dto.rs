use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponseDto {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageResponseDto {
    pub message: String,
}

/// Partial failures that are still reported with a 200.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorMessageDto {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetailDto {
    pub detail: String,
}

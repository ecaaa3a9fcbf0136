use serde::{Deserialize, Serialize};
use ts_rs::TS;

use anteroom_application::AccessStatus;
use anteroom_domain::AccessRequest;

/// Incoming payload for a visitor access request.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-request-submit-request.ts"
)]
pub struct AccessRequestSubmitRequest {
    pub name: String,
    pub email: String,
    pub reason: Option<String>,
}

/// Submission outcome reported back to the visitor.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-request-submit-response.ts"
)]
pub struct AccessRequestSubmitResponse {
    pub status: String,
    pub request_id: Option<String>,
}

impl AccessRequestSubmitResponse {
    pub fn submitted(request: &AccessRequest) -> Self {
        Self {
            status: "submitted".to_owned(),
            request_id: Some(request.id.to_string()),
        }
    }

    pub fn already_authorized() -> Self {
        Self {
            status: "already_authorized".to_owned(),
            request_id: None,
        }
    }

    pub fn already_pending() -> Self {
        Self {
            status: "pending".to_owned(),
            request_id: None,
        }
    }
}

/// Polling payload answering "may this email enter right now".
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-check-response.ts"
)]
pub struct AccessCheckResponse {
    pub authorized: bool,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<i64>,
}

impl From<AccessStatus> for AccessCheckResponse {
    fn from(status: AccessStatus) -> Self {
        match status {
            AccessStatus::Authorized {
                access_type,
                remaining_seconds,
            } => Self {
                authorized: true,
                status: "authorized".to_owned(),
                access_type: Some(access_type.as_str().to_owned()),
                remaining_seconds,
            },
            AccessStatus::Pending => Self {
                authorized: false,
                status: "pending".to_owned(),
                access_type: None,
                remaining_seconds: None,
            },
            AccessStatus::Unauthorized => Self {
                authorized: false,
                status: "unauthorized".to_owned(),
                access_type: None,
                remaining_seconds: None,
            },
        }
    }
}

/// Incoming payload for the out-of-band approval link.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-action-approve-request.ts"
)]
pub struct AccessActionApproveRequest {
    pub request_id: String,
    pub access_type: String,
}

/// Incoming payload for the out-of-band denial link.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-action-deny-request.ts"
)]
pub struct AccessActionDenyRequest {
    pub request_id: String,
}

/// Decision outcome shared by both approval channels.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-decision-response.ts"
)]
pub struct AccessDecisionResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_type: Option<String>,
}

impl AccessDecisionResponse {
    pub fn approved(request: &AccessRequest) -> Self {
        Self {
            status: "approved".to_owned(),
            name: Some(request.name.clone()),
            email: Some(request.email.clone()),
            access_type: request
                .access_type
                .map(|access_type| access_type.as_str().to_owned()),
        }
    }

    pub fn denied(request: &AccessRequest) -> Self {
        Self {
            status: "denied".to_owned(),
            name: Some(request.name.clone()),
            email: Some(request.email.clone()),
            access_type: None,
        }
    }

    pub fn already_processed() -> Self {
        Self {
            status: "already_processed".to_owned(),
            name: None,
            email: None,
            access_type: None,
        }
    }
}

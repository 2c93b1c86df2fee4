//! Refresh token record <-> model mapper

use iam_core::entities::RefreshTokenRecord;

use crate::models::RefreshTokenModel;

impl From<RefreshTokenModel> for RefreshTokenRecord {
    fn from(model: RefreshTokenModel) -> Self {
        RefreshTokenRecord {
            id: model.id,
            account_id: model.account_id,
            token: model.token,
            expires_at: model.expires_at,
            created_at: model.created_at,
        }
    }
}

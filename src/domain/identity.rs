use serde::{Deserialize, Serialize};

use super::Email;

/// 認証済みの呼び出し元
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: Email,
    pub full_name: String,
    pub roles: Vec<String>,
}

/// 操作の呼び出し元
///
/// セッションのような暗黙の状態は持たず、各操作に明示的に渡す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Guest,
    Authenticated(Identity),
}

impl Caller {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Caller::Guest => None,
            Caller::Authenticated(identity) => Some(identity),
        }
    }
}

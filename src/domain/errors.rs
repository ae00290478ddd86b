/// 貸出のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RentArticleError {
    /// 今日を含む会員資格がない
    NoActiveMembership,
    /// 貸出上限に達している
    LimitExceeded { max: u32 },
    /// 資料が貸出中
    NotAvailable,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnArticleError {
    /// 参照先が貸出取引ではない
    NotAnIssueTransaction,
}

/// 会員資格加入のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinMembershipError {
    /// 既に有効な会員資格がある
    AlreadyActive,
}

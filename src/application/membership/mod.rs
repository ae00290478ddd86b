mod membership_service;

pub use membership_service::{
    Eligibility, MemberActivity, MembershipStatus, check_membership_eligibility,
    get_member_activity, get_membership_status, join_membership,
};

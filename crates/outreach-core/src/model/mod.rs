pub mod campaign;
pub mod enrollment;
pub mod member;
pub mod operations;
pub mod status;
pub mod target_list;
pub mod user;

pub use campaign::{Campaign, SequenceStep};
pub use enrollment::{
    CampaignEnrollment, EnrolledRecipient, EnrollmentProfile, EnrollmentSnapshotData,
    ProfileSnapshot,
};
pub use member::{ListMember, MemberSource, NewListMember, NormalizedFields, ProfileField};
pub use operations::ProfileOperations;
pub use status::{
    ActiveState, CampaignStatus, EmailStatus, EnrollmentStatus, ListType, ResponseStatus,
};
pub use target_list::TargetList;
pub use user::User;

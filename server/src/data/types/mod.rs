//! Shared data types for the transactional store

mod enums;
mod transactional;

pub use enums::{DocumentSort, DocumentStatus, SortDirection, UserRole, UserSort, UserStatus};

pub use transactional::{
    AuditLogRow, DailyUploadRow, DocumentPatch, DocumentRow, DocumentWithUploader,
    ListDocumentsParams, ListUsersParams, MajorPatch, MajorRow, MajorWithSubjects, NewDocument,
    NewSubject, NewUser, PlatformStatsRow, StatsDelta, StatusChange, SubjectPatch, SubjectRow,
    UserProfilePatch, UserRow, UserSummary,
};

pub mod auth;
pub mod common;
pub mod contact;
pub mod education;
pub mod experience;
pub mod extract;
pub mod profile;
pub mod project;
pub mod skill;

pub use auth::{
    login, register, reset_password, AuthResponse, LoginRequest, RegisterRequest,
    ResetPasswordRequest,
};
pub use common::ApiReply;
pub use contact::{
    create_contact, delete_contact, get_contact, list_contacts, update_contact, ContactRequest,
    NoteInput, ReplyInput,
};
pub use education::{
    create_education, delete_education, get_education, list_educations, update_education,
    CertificateInput, EducationRequest,
};
pub use experience::{
    create_experience, delete_experience, get_experience, list_experiences, update_experience,
    ExperienceRequest,
};
pub use extract::{AppJson, ClientInfo, FormPayload};
pub use profile::{get_profile, update_profile, UpdateProfileRequest};
pub use project::{
    create_project, delete_project, get_project, list_projects, update_project, ProjectRequest,
};
pub use skill::{
    create_skill, delete_skill, get_skill, list_skills, update_skill, CertificationInput,
    ResourceInput, SkillRequest,
};

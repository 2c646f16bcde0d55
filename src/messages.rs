//! Response messages shared by handlers, middleware and the error type.

// General
pub const SERVER_ERROR: &str = "Internal server error";
pub const DUPLICATE_ENTRY: &str = "Entry already exists";
pub const VALIDATION_ERROR: &str = "Validation error";
pub const INVALID_ID: &str = "Invalid ID format";
pub const ROUTE_NOT_FOUND: &str = "Route not found";
pub const NO_VALID_FIELDS: &str = "No valid fields to update";

// Auth
pub const TOKEN_MISSING: &str = "Authorization token missing or invalid";
pub const INVALID_TOKEN: &str = "Invalid or expired token";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const REGISTER_SUCCESS: &str = "User registered successfully";
pub const LOGIN_SUCCESS: &str = "Login successful";
pub const PASSWORD_RESET_SUCCESS: &str = "Password reset successfully";

// Profile
pub const USER_NOT_FOUND: &str = "User not found";
pub const USER_PROFILE_FETCHED: &str = "User profile fetched successfully";
pub const USER_PROFILE_UPDATED: &str = "User profile updated successfully";

// Skills
pub const SKILL_FETCH_SUCCESS: &str = "Skill fetched successfully";
pub const SKILLS_FETCH_SUCCESS: &str = "Skills fetched successfully";
pub const SKILL_CREATE_SUCCESS: &str = "Skill created successfully";
pub const SKILL_UPDATE_SUCCESS: &str = "Skill updated successfully";
pub const SKILL_DELETE_SUCCESS: &str = "Skill deleted successfully";
pub const SKILL_NOT_FOUND: &str = "Skill not found";
pub const SKILL_DUPLICATE: &str = "Skill with same name already exists";

// Experience
pub const EXPERIENCE_CREATED_SUCCESS: &str = "Experience created successfully";
pub const EXPERIENCES_FETCH_SUCCESS: &str = "Experiences fetched successfully";
pub const EXPERIENCE_FETCH_SUCCESS: &str = "Experience fetched successfully";
pub const EXPERIENCE_UPDATE_SUCCESS: &str = "Experience updated successfully";
pub const EXPERIENCE_DELETE_SUCCESS: &str = "Experience deleted successfully";
pub const EXPERIENCE_DUPLICATE: &str = "Experience with same title and company already exists";
pub const EXPERIENCE_NOT_FOUND: &str = "Experience not found";

// Projects
pub const PROJECTS_FETCH_SUCCESS: &str = "Projects fetched successfully";
pub const PROJECT_FETCH_SUCCESS: &str = "Project fetched successfully";
pub const PROJECT_CREATE_SUCCESS: &str = "Project created successfully";
pub const PROJECT_UPDATE_SUCCESS: &str = "Project updated successfully";
pub const PROJECT_DELETE_SUCCESS: &str = "Project deleted successfully";
pub const PROJECT_NOT_FOUND: &str = "Project not found";
pub const PROJECT_DUPLICATE: &str = "Project with same title already exists";

// Education
pub const EDUCATIONS_FETCH_SUCCESS: &str = "Education entries fetched successfully";
pub const EDUCATION_FETCH_SUCCESS: &str = "Education entry fetched successfully";
pub const EDUCATION_CREATE_SUCCESS: &str = "Education entry created successfully";
pub const EDUCATION_UPDATE_SUCCESS: &str = "Education entry updated successfully";
pub const EDUCATION_DELETE_SUCCESS: &str = "Education entry deleted successfully";
pub const EDUCATION_NOT_FOUND: &str = "Education entry not found";
pub const EDUCATION_DUPLICATE: &str = "Education entry already exists";

// Contact
pub const CONTACT_CREATED_SUCCESS: &str = "Contact created successfully";
pub const CONTACTS_FETCH_SUCCESS: &str = "Contacts fetched successfully";
pub const CONTACT_FETCH_SUCCESS: &str = "Contact fetched successfully";
pub const CONTACT_UPDATE_SUCCESS: &str = "Contact updated successfully";
pub const CONTACT_DELETE_SUCCESS: &str = "Contact deleted successfully";
pub const CONTACT_NOT_FOUND: &str = "Contact not found";

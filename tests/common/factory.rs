use bson::oid::ObjectId;

use portfolio_api::models::{
    Contact, Education, Experience, EmploymentType, Project, ProjectCategory, Role, Skill,
    SkillCategory, User,
};
use portfolio_api::services::AuthService;
use portfolio_api::state::AppState;
use portfolio_api::validation::DateValue;

pub const PASSWORD: &str = "TestPassword123!";

/// Authentication info for tests
pub struct TestAuth {
    pub user_id: ObjectId,
    pub email: String,
    pub token: String,
}

impl TestAuth {
    /// Get the Authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Date from `YYYY-MM-DD`
pub fn date(raw: &str) -> bson::DateTime {
    serde_json::from_value::<DateValue>(serde_json::json!(raw))
        .expect("valid date")
        .into_bson()
}

/// Factory for creating test data directly in the stores
pub struct Factory<'a> {
    state: &'a AppState,
}

impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a test user and return auth info
    pub async fn create_user(&self) -> TestAuth {
        let email = format!("test-{}@example.com", ObjectId::new().to_hex());
        let user = self.create_user_with_email(&email, PASSWORD).await;

        let token = AuthService::generate_token(user.id, &user.email, &self.state.config).unwrap();

        TestAuth {
            user_id: user.id,
            email: user.email,
            token,
        }
    }

    /// Create a test user with specific email
    pub async fn create_user_with_email(&self, email: &str, password: &str) -> User {
        let password_hash = AuthService::hash_password(password, &self.state.config).unwrap();
        let user = User::new(
            "Test".to_string(),
            "User".to_string(),
            email,
            password_hash,
            Role::User,
        );

        self.state.users.insert(user).await.unwrap()
    }

    pub async fn create_skill(&self, name: &str) -> Skill {
        let skill = Skill::new(name.to_string(), SkillCategory::Backend, 80);
        self.state.skills.insert(skill).await.unwrap()
    }

    pub async fn create_experience(&self, job_title: &str, company: &str) -> Experience {
        let experience = Experience::new(
            job_title.to_string(),
            company.to_string(),
            EmploymentType::FullTime,
            date("2021-03-01"),
            "Built things".to_string(),
        );
        self.state.experiences.insert(experience).await.unwrap()
    }

    pub async fn create_project(&self, title: &str) -> Project {
        let project = Project::new(
            title.to_string(),
            None,
            "A test project".to_string(),
            ProjectCategory::Backend,
        );
        self.state.projects.insert(project).await.unwrap()
    }

    pub async fn create_education(&self, institution: &str, start: &str) -> Education {
        let education = Education::new(
            institution.to_string(),
            "BSc".to_string(),
            "Computer Science".to_string(),
            date(start),
        );
        self.state.educations.insert(education).await.unwrap()
    }

    pub async fn create_contact(&self, subject: &str) -> Contact {
        let contact = Contact::new(
            "Ada Lovelace".to_string(),
            "ada@example.com".to_string(),
            subject.to_string(),
            "Hello there".to_string(),
        );
        self.state.contacts.insert(contact).await.unwrap()
    }
}

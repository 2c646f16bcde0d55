use bson::doc;

use crate::error::AppResult;
use crate::models::Project;
use crate::repositories::Repository;

pub type ProjectRepository = Repository<Project>;

impl Repository<Project> {
    pub async fn find_by_title(&self, title: &str) -> AppResult<Option<Project>> {
        self.find_one(doc! { "title": title }).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Project>> {
        self.find_one(doc! { "slug": slug }).await
    }
}

use crate::models::Contact;
use crate::repositories::Repository;

pub type ContactRepository = Repository<Contact>;

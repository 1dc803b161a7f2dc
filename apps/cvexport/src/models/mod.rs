pub mod resume;
pub mod section;

pub use resume::{Basics, Education, Project, ResumeData, Skill, WorkExperience};
pub use section::{SectionOrder, KNOWN_SECTIONS};

pub const ADVISOR_SYSTEM: &str = include_str!("../data/prompts/advisor_system.txt");
pub const DIAGNOSIS_SYSTEM: &str = include_str!("../data/prompts/diagnosis_system.txt");
/// Used when an image arrives without an accompanying question.
pub const DIAGNOSIS_USER: &str = include_str!("../data/prompts/diagnosis_user.txt");

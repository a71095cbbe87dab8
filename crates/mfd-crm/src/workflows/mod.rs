pub mod assessments;

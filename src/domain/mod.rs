pub mod artwork;
pub mod descriptor;
pub mod track;

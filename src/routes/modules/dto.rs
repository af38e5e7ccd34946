use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::entities::sea_orm_active_enums::VideoSource;
use crate::error::{TrainingError, TrainingResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateModuleRequest {
    pub training_id: i32,

    #[schema(example = "Introduction to tax assessment")]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    #[schema(example = "https://www.youtube.com/embed/dQw4w9WgXcQ")]
    pub video_embed: String,

    /// One of `youtube`, `canva`, `iframe`; defaults to `youtube`
    #[schema(example = "youtube")]
    pub video_source: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateModuleRequest {
    pub training_id: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_embed: Option<String>,
    pub video_source: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ModuleFilter {
    /// Only modules of this training
    pub training_id: Option<i32>,
}

pub fn parse_video_source(raw: &str) -> TrainingResult<VideoSource> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "youtube" => Ok(VideoSource::Youtube),
        "canva" => Ok(VideoSource::Canva),
        "iframe" => Ok(VideoSource::Iframe),
        other => Err(TrainingError::validation(
            "video_source",
            format!("'{other}' is not one of youtube, canva, iframe"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sources_parse_case_insensitively() {
        assert_eq!(parse_video_source("YouTube").unwrap(), VideoSource::Youtube);
        assert_eq!(parse_video_source(" canva ").unwrap(), VideoSource::Canva);
        assert_eq!(parse_video_source("iframe").unwrap(), VideoSource::Iframe);
    }

    #[test]
    fn unknown_source_names_the_field() {
        match parse_video_source("vimeo") {
            Err(TrainingError::Validation { field, .. }) => assert_eq!(field, "video_source"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}

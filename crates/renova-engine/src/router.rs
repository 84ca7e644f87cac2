use renova_contracts::errors::RenderError;
use renova_contracts::render::{RenderMode, RenderRequest, SourceImage};

use crate::capabilities::ImageFetcher;

/// Which pathway serves a request. A modification route carries the photo
/// reference; its bytes are fetched by [`fetch_source`] once the pathway
/// starts, inside the fallback boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Creation,
    Modification { source_url: &'a str },
}

impl Route<'_> {
    pub fn pathway(&self) -> &'static str {
        match self {
            Self::Creation => "creation",
            Self::Modification { .. } => "modification",
        }
    }
}

pub fn route(request: &RenderRequest) -> Result<Route<'_>, RenderError> {
    match request.mode {
        RenderMode::Creation => Ok(Route::Creation),
        RenderMode::Modification => match request.source_image() {
            Some(source_url) => Ok(Route::Modification { source_url }),
            None => Err(RenderError::Validation(
                "sourceImageUrl is required in modification mode".to_string(),
            )),
        },
    }
}

/// The router's one side effect: a single GET of the modification photo.
pub fn fetch_source(
    source_url: &str,
    fetcher: &dyn ImageFetcher,
) -> Result<SourceImage, RenderError> {
    fetcher.fetch(source_url).map_err(|err| RenderError::fetch(&err))
}

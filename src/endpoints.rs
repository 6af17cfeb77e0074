use crate::{ApiError, Result};

/// Catalogue of portal REST resources.
///
/// Paths are relative to the client's base URL; see
/// [`PortalClient::endpoint_url`](crate::PortalClient::endpoint_url).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Endpoint {
    Sliders,
    Albums,
    AlbumImages(String),
    Blogs,
    Blog(String),
    Candidates,
    Candidate(String),
    CandidateConnect(String),
    Classifieds,
    ClassifiedRegister,
    ClassifiedStatus(String),
}

impl Endpoint {
    /// Raw path segments, identifiers trimmed but not yet percent-encoded.
    ///
    /// Empty, `.` and `..` identifiers are rejected with `INVALID_REQUEST`.
    pub fn segments(&self) -> Result<Vec<&str>> {
        let segments = match self {
            Self::Sliders => vec!["sliders"],
            Self::Albums => vec!["albums"],
            Self::AlbumImages(id) => vec!["albums", identifier(id)?, "images"],
            Self::Blogs => vec!["blogs"],
            Self::Blog(slug) => vec!["blogs", identifier(slug)?],
            Self::Candidates => vec!["candidates"],
            Self::Candidate(id) => vec!["candidates", identifier(id)?],
            Self::CandidateConnect(id) => vec!["candidates", identifier(id)?, "connect"],
            Self::Classifieds => vec!["classifieds"],
            Self::ClassifiedRegister => vec!["classifieds", "register"],
            Self::ClassifiedStatus(contact) => {
                vec!["classifieds", "status", identifier(contact)?]
            }
        };
        Ok(segments)
    }
}

fn identifier(value: &str) -> Result<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(ApiError::invalid_request(format!(
            "invalid path identifier '{value}'"
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::Endpoint;
    use crate::ErrorCode;

    #[test]
    fn static_segments() {
        assert_eq!(Endpoint::Sliders.segments().unwrap(), ["sliders"]);
        assert_eq!(Endpoint::Albums.segments().unwrap(), ["albums"]);
        assert_eq!(Endpoint::Blogs.segments().unwrap(), ["blogs"]);
        assert_eq!(Endpoint::Candidates.segments().unwrap(), ["candidates"]);
        assert_eq!(Endpoint::Classifieds.segments().unwrap(), ["classifieds"]);
        assert_eq!(
            Endpoint::ClassifiedRegister.segments().unwrap(),
            ["classifieds", "register"]
        );
    }

    #[test]
    fn templated_segments_trim_their_identifier() {
        assert_eq!(
            Endpoint::AlbumImages(" 12 ".to_owned()).segments().unwrap(),
            ["albums", "12", "images"]
        );
        assert_eq!(
            Endpoint::CandidateConnect("7".to_owned()).segments().unwrap(),
            ["candidates", "7", "connect"]
        );
    }

    #[test]
    fn identifiers_keep_reserved_characters_for_encoding() {
        assert_eq!(
            Endpoint::ClassifiedStatus("user?admin=1".to_owned())
                .segments()
                .unwrap(),
            ["classifieds", "status", "user?admin=1"]
        );
    }

    #[test]
    fn empty_and_dot_identifiers_are_rejected() {
        for id in ["", "   ", ".", ".."] {
            let err = Endpoint::Candidate(id.to_owned())
                .segments()
                .expect_err("identifier must be rejected");
            assert_eq!(err.code, ErrorCode::InvalidRequest, "id {id:?}");
        }
    }
}

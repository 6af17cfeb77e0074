//! Named calls for each catalogued portal resource.

use serde_json::Value;

use crate::{transport::Transport, Body, Endpoint, MultipartForm, PortalClient, Result};

impl<T: Transport> PortalClient<T> {
    /// Home page slider entries.
    pub async fn sliders(&self) -> Result<Value> {
        let url = self.endpoint_url(&Endpoint::Sliders)?;
        self.get(&url).await
    }

    /// Gallery albums.
    pub async fn albums(&self) -> Result<Value> {
        let url = self.endpoint_url(&Endpoint::Albums)?;
        self.get(&url).await
    }

    pub async fn album_images(&self, album_id: &str) -> Result<Value> {
        let url = self.endpoint_url(&Endpoint::AlbumImages(album_id.to_owned()))?;
        self.get(&url).await
    }

    pub async fn blogs(&self) -> Result<Value> {
        let url = self.endpoint_url(&Endpoint::Blogs)?;
        self.get(&url).await
    }

    pub async fn blog(&self, slug: &str) -> Result<Value> {
        let url = self.endpoint_url(&Endpoint::Blog(slug.to_owned()))?;
        self.get(&url).await
    }

    /// Matrimony candidate listing.
    pub async fn candidates(&self) -> Result<Value> {
        let url = self.endpoint_url(&Endpoint::Candidates)?;
        self.get(&url).await
    }

    pub async fn candidate(&self, candidate_id: &str) -> Result<Value> {
        let url = self.endpoint_url(&Endpoint::Candidate(candidate_id.to_owned()))?;
        self.get(&url).await
    }

    /// Sends a connection request to a candidate.
    pub async fn connect_candidate(
        &self,
        candidate_id: &str,
        payload: impl Into<Body>,
    ) -> Result<Value> {
        let url = self.endpoint_url(&Endpoint::CandidateConnect(candidate_id.to_owned()))?;
        self.post(&url, payload).await
    }

    pub async fn classifieds(&self) -> Result<Value> {
        let url = self.endpoint_url(&Endpoint::Classifieds)?;
        self.get(&url).await
    }

    /// Registers a classified listing; the form usually carries photos.
    pub async fn register_classified(&self, form: MultipartForm) -> Result<Value> {
        let url = self.endpoint_url(&Endpoint::ClassifiedRegister)?;
        self.post(&url, form).await
    }

    /// Looks up listing status by the contact (phone or email) it was registered with.
    pub async fn classified_status(&self, contact: &str) -> Result<Value> {
        let url = self.endpoint_url(&Endpoint::ClassifiedStatus(contact.to_owned()))?;
        self.get(&url).await
    }
}

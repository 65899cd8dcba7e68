use crate::{
    error::ApiError,
    types::{FetchResult, ProfileSummary, UserProfile},
};

use super::{SpotifyApi, failed, first_image};

pub fn summarize_profile(user: UserProfile) -> ProfileSummary {
    ProfileSummary {
        image_url: user
            .images
            .as_deref()
            .and_then(first_image)
            .unwrap_or_default(),
        id: user.id,
        display_name: user.display_name.unwrap_or_default(),
        email: user.email.unwrap_or_default(),
        country: user.country.unwrap_or_default(),
        followers: user.followers.map(|f| f.total).unwrap_or(0),
        product: user.product.unwrap_or_default(),
    }
}

impl SpotifyApi {
    pub async fn get_user_profile(&self, token: &str) -> FetchResult<ProfileSummary> {
        match self.fetch_profile(token).await {
            Ok(profile) => FetchResult::success(profile, None),
            Err(e) => failed("profile", e),
        }
    }

    /// Like [`SpotifyApi::get_user_profile`] but keeps the typed error, for
    /// callers that need to branch on it.
    pub async fn fetch_profile(&self, token: &str) -> Result<ProfileSummary, ApiError> {
        self.get_json::<UserProfile>(token, "/me", &[])
            .await?
            .map(summarize_profile)
            .ok_or_else(|| ApiError::Decode("empty profile response".to_string()))
    }
}

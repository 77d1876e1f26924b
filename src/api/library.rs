use crate::api::{bounded_perpage, model};
use crate::client::{LastFm, PagedQuery};
use crate::iterator::PaginatedIterator;
use crate::params::Params;
use crate::types::Artist;
use crate::{LastFmError, Result};
use http_types::Method;

/// `library.*` endpoints.
pub struct LibraryApi {
    client: LastFm,
}

impl LibraryApi {
    pub(crate) fn new(client: LastFm) -> Self {
        Self { client }
    }

    /// A paginated list of all the artists in a user's library, with play
    /// counts and tag counts.
    ///
    /// <https://www.last.fm/api/show/library.getArtists>
    pub async fn get_artists(
        &self,
        username: Option<&str>,
        limit: Option<u64>,
    ) -> Result<PaginatedIterator<Artist>> {
        let user = username
            .or_else(|| self.client.username())
            .ok_or_else(|| {
                LastFmError::InvalidArgument("no username given or configured".to_string())
            })?
            .to_string();

        let resp = self
            .client
            .paginate_request(
                Method::Get,
                PagedQuery::new("library.getArtists", "artist")
                    .unwrap_key("artists")
                    .perpage(bounded_perpage(limit))
                    .limit(limit),
                Params::new().put("user", user),
            )
            .await?;
        Ok(resp.items.try_map(model))
    }
}

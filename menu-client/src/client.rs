//! Typed menu-server API

use reqwest::Method;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use shared::client::{
    AdminUsersRequest, CreatedUser, EditCommand, EditSessionView, GeneratedMenu,
    OpenMenuRequest, SuccessResponse,
};
use shared::models::{DishGroup, DishQuery, HistoryCreate, HistoryRecord, Preferences, Profile};

use crate::{AuthContext, ClientConfig, ClientError, ClientResult, HttpClient};

/// Result of an editor export
#[derive(Debug, Clone, PartialEq)]
pub enum ExportedMenu {
    Pdf { file_name: String, bytes: Vec<u8> },
    /// Print view served when the PDF could not be produced
    Print { html: String },
}

/// Menu-server client
///
/// Every authenticated call takes the caller's [`AuthContext`], which is
/// refreshed in place when its access token is close to expiry.
#[derive(Debug, Clone)]
pub struct MenuClient {
    http: HttpClient,
    refresh_leeway_secs: i64,
}

impl MenuClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
            refresh_leeway_secs: config.refresh_leeway_secs,
        })
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    // ========== Session ==========

    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<AuthContext> {
        AuthContext::sign_in(&self.http, email, password, self.refresh_leeway_secs).await
    }

    pub async fn sign_out(&self, auth: AuthContext) -> ClientResult<()> {
        auth.sign_out(&self.http).await
    }

    pub async fn session(&self, auth: &mut AuthContext) -> ClientResult<Profile> {
        let token = auth.access_token(&self.http).await?;
        self.http.get("/api/auth/session", Some(&token)).await
    }

    // ========== Library ==========

    pub async fn cuisines(&self, auth: &mut AuthContext) -> ClientResult<Vec<String>> {
        let token = auth.access_token(&self.http).await?;
        self.http.get("/api/cuisines", Some(&token)).await
    }

    pub async fn dishes(
        &self,
        auth: &mut AuthContext,
        cuisine: Option<&str>,
        search: Option<&str>,
    ) -> ClientResult<Vec<DishGroup>> {
        let token = auth.access_token(&self.http).await?;
        let query = DishQuery {
            cuisine: cuisine.map(str::to_string),
            q: search.map(str::to_string),
        };
        self.http.get_query("/api/dishes", Some(&token), &query).await
    }

    // ========== Menus and history ==========

    pub async fn generate(
        &self,
        auth: &mut AuthContext,
        preferences: &Preferences,
    ) -> ClientResult<GeneratedMenu> {
        let token = auth.access_token(&self.http).await?;
        self.http
            .post("/api/menus/generate", Some(&token), preferences)
            .await
    }

    pub async fn history(&self, auth: &mut AuthContext) -> ClientResult<Vec<HistoryRecord>> {
        let token = auth.access_token(&self.http).await?;
        self.http.get("/api/history", Some(&token)).await
    }

    pub async fn history_record(
        &self,
        auth: &mut AuthContext,
        id: &str,
    ) -> ClientResult<HistoryRecord> {
        let token = auth.access_token(&self.http).await?;
        self.http
            .get(&format!("/api/history/{id}"), Some(&token))
            .await
    }

    pub async fn save_history(
        &self,
        auth: &mut AuthContext,
        record: &HistoryCreate,
    ) -> ClientResult<HistoryRecord> {
        let token = auth.access_token(&self.http).await?;
        self.http.post("/api/history", Some(&token), record).await
    }

    pub async fn delete_history(&self, auth: &mut AuthContext, id: &str) -> ClientResult<()> {
        let token = auth.access_token(&self.http).await?;
        let _: SuccessResponse = self
            .http
            .delete(&format!("/api/history/{id}"), Some(&token))
            .await?;
        Ok(())
    }

    // ========== Account administration ==========

    pub async fn admin_create_user(
        &self,
        auth: &mut AuthContext,
        email: &str,
        password: &str,
        role: &str,
    ) -> ClientResult<CreatedUser> {
        let token = auth.access_token(&self.http).await?;
        let request = AdminUsersRequest::create(email, password, role);
        self.http
            .post("/api/admin-users", Some(&token), &request)
            .await
    }

    /// Delete an account; deleting the signed-in account is refused locally
    pub async fn admin_delete_user(&self, auth: &mut AuthContext, user_id: &str) -> ClientResult<()> {
        if user_id == auth.user_id() {
            return Err(ClientError::SelfDelete);
        }
        let token = auth.access_token(&self.http).await?;
        let request = AdminUsersRequest::delete(user_id);
        let _: SuccessResponse = self
            .http
            .post("/api/admin-users", Some(&token), &request)
            .await?;
        Ok(())
    }

    // ========== Editor ==========

    pub async fn open_menu(
        &self,
        auth: &mut AuthContext,
        request: &OpenMenuRequest,
    ) -> ClientResult<EditSessionView> {
        let token = auth.access_token(&self.http).await?;
        self.http.post("/api/editor/open", Some(&token), request).await
    }

    pub async fn open_history(
        &self,
        auth: &mut AuthContext,
        history_id: &str,
    ) -> ClientResult<EditSessionView> {
        let token = auth.access_token(&self.http).await?;
        self.http
            .post_empty(&format!("/api/editor/open/{history_id}"), Some(&token))
            .await
    }

    pub async fn begin_edit(&self, auth: &mut AuthContext) -> ClientResult<EditSessionView> {
        let token = auth.access_token(&self.http).await?;
        self.http.post_empty("/api/editor/edit", Some(&token)).await
    }

    pub async fn apply(
        &self,
        auth: &mut AuthContext,
        command: &EditCommand,
    ) -> ClientResult<EditSessionView> {
        let token = auth.access_token(&self.http).await?;
        self.http.post("/api/editor/ops", Some(&token), command).await
    }

    pub async fn save_edits(&self, auth: &mut AuthContext) -> ClientResult<EditSessionView> {
        let token = auth.access_token(&self.http).await?;
        self.http.post_empty("/api/editor/save", Some(&token)).await
    }

    pub async fn archive(&self, auth: &mut AuthContext) -> ClientResult<HistoryRecord> {
        let token = auth.access_token(&self.http).await?;
        self.http.post_empty("/api/editor/archive", Some(&token)).await
    }

    pub async fn export(&self, auth: &mut AuthContext) -> ClientResult<ExportedMenu> {
        let token = auth.access_token(&self.http).await?;
        let response = self
            .http
            .send_raw::<()>(Method::POST, "/api/editor/export", Some(&token), None)
            .await?;

        let is_pdf = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/pdf"));
        if !is_pdf {
            return Ok(ExportedMenu::Print {
                html: response.text().await?,
            });
        }

        // Raw bytes: servers may send non-ASCII names outside `filename*`
        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .and_then(|v| attachment_name(&v))
            .unwrap_or_else(|| "Menu.pdf".to_string());
        let bytes = response.bytes().await?.to_vec();
        Ok(ExportedMenu::Pdf { file_name, bytes })
    }
}

/// File name of an `attachment` disposition, preferring RFC 5987
/// `filename*=UTF-8''…` over the plain `filename`
fn attachment_name(disposition: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;
    for param in disposition.split(';') {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "filename" => plain = Some(value.trim_matches('"').to_string()),
            "filename*" => extended = decode_extended(value),
            _ => {}
        }
    }
    let non_empty = |name: &String| !name.is_empty();
    extended.filter(non_empty).or(plain.filter(non_empty))
}

/// `UTF-8''Caf%C3%A9.pdf` → `Café.pdf`; other charsets are not decoded
fn decode_extended(value: &str) -> Option<String> {
    let (charset, rest) = value.split_once('\'')?;
    if !charset.eq_ignore_ascii_case("utf-8") {
        return None;
    }
    let (_language, encoded) = rest.split_once('\'')?;
    urlencoding::decode(encoded).ok().map(|name| name.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_name() {
        assert_eq!(
            attachment_name("attachment; filename=\"Patel_Wedding_Menu.pdf\"").as_deref(),
            Some("Patel_Wedding_Menu.pdf")
        );
        assert_eq!(attachment_name("attachment"), None);
        assert_eq!(attachment_name("attachment; filename=\"\""), None);
    }

    #[test]
    fn test_attachment_name_prefers_utf8_name() {
        assert_eq!(
            attachment_name(
                "attachment; filename=\"Caf__Menu.pdf\"; filename*=UTF-8''Caf%C3%A9_Menu.pdf"
            )
            .as_deref(),
            Some("Café_Menu.pdf")
        );
        assert_eq!(
            attachment_name("attachment; FILENAME*=utf-8'en'%E0%A4%B6%E0%A4%BE%E0%A4%A6%E0%A5%80.pdf")
                .as_deref(),
            Some("शादी.pdf")
        );
        // Undecodable extended value falls back to the plain name
        assert_eq!(
            attachment_name("attachment; filename=\"Menu_1.pdf\"; filename*=ISO-8859-1''Men%FC.pdf")
                .as_deref(),
            Some("Menu_1.pdf")
        );
        assert_eq!(
            attachment_name("attachment; filename=\"Menu_2.pdf\"; filename*=UTF-8''%FF.pdf").as_deref(),
            Some("Menu_2.pdf")
        );
    }
}

use std::future::{ready, Ready};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use log::debug;
use uuid::Uuid;

use crate::{dto::Claims, errors::ApiError, models::Role};

use self::jwt::{JwtSecrets, TokenType};

use super::permission::Permissions;

pub const BEARER: &str = "Bearer ";

/// Identity of the caller, taken from a valid access token.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAuthData {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl UserAuthData {
    pub fn permissions(&self) -> Permissions {
        Permissions::for_role(self.role)
    }
}

impl From<Claims> for UserAuthData {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Stored in the request extensions when a bearer token was sent but rejected.
#[derive(Debug, Clone)]
pub struct AuthFailure(pub ApiError);

/// Returns the authenticated caller or the reason there is none.
pub fn current_user(req: &HttpRequest) -> Result<UserAuthData, ApiError> {
    let extensions = req.extensions();
    if let Some(user_auth_data) = extensions.get::<UserAuthData>() {
        return Ok(user_auth_data.clone());
    }
    match extensions.get::<AuthFailure>() {
        Some(AuthFailure(err)) => Err(err.clone()),
        None => Err(ApiError::unauthorized("missing or malformed token")),
    }
}

/// Decodes the access token of every request. Public routes ignore the
/// outcome, private routes read it back through [`current_user`].
pub struct AuthMiddleware {
    secrets: JwtSecrets,
}

impl AuthMiddleware {
    pub fn new(secrets: JwtSecrets) -> Self {
        Self { secrets }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            secrets: self.secrets.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    secrets: JwtSecrets,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match jwt::parse_request(req.headers(), BEARER) {
            Ok(Some(token)) => match jwt::decode_claims(&TokenType::Access, &token, &self.secrets) {
                Ok(data) => {
                    req.extensions_mut().insert(UserAuthData::from(data.claims));
                }
                Err(err) => {
                    debug!("rejected access token on {}: {:?}", req.path(), err);
                    req.extensions_mut().insert(AuthFailure(err.into()));
                }
            },
            Ok(None) => {}
            Err(err) => {
                req.extensions_mut().insert(AuthFailure(err));
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}

pub mod jwt {
    use std::fmt;

    use actix_web::http::header::{HeaderMap, AUTHORIZATION};
    use chrono::Utc;
    use jsonwebtoken::{
        decode, encode, errors::Error, Algorithm, DecodingKey, EncodingKey, Header, TokenData,
        Validation,
    };
    use log::info;
    use serde::Serialize;
    use uuid::Uuid;

    use crate::{
        db,
        dto::{Claims, LoginUserRequest, UpdateUserDto},
        errors::ApiError,
        models::{Role, UserProfile},
        service::crypto,
        PGPool, ACCESS_TOKEN_EXP, REFRESH_TOKEN_EXP,
    };

    pub enum TokenType {
        Refresh,
        Access,
    }

    #[derive(Clone)]
    pub struct JwtSecrets {
        access: String,
        refresh: String,
    }

    impl JwtSecrets {
        pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
            Self {
                access: access.into(),
                refresh: refresh.into(),
            }
        }

        fn get(&self, token_type: &TokenType) -> &str {
            match token_type {
                TokenType::Refresh => &self.refresh,
                TokenType::Access => &self.access,
            }
        }
    }

    impl fmt::Debug for JwtSecrets {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("JwtSecrets { .. }")
        }
    }

    #[derive(Debug, Serialize)]
    pub struct LoginResponse {
        pub token: String,
        #[serde(rename = "refreshToken")]
        pub refresh_token: String,
        pub user: UserProfile,
    }

    pub fn decode_claims(token_type: &TokenType, token: &str, secrets: &JwtSecrets) -> Result<TokenData<Claims>, Error> {
        let decoding_key = DecodingKey::from_secret(secrets.get(token_type).as_ref());
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &decoding_key, &validation)
    }

    /// `exp` is the lifetime in seconds from now.
    pub fn create(
        token_type: &TokenType,
        user_id: &Uuid,
        email: &str,
        role: Role,
        exp: usize,
        secrets: &JwtSecrets,
    ) -> Result<String, Error> {
        let exp_timestamp = Utc::now().timestamp() as usize + exp;
        let header: Header = Header::new(Algorithm::HS256);
        let claims: Claims = Claims::new(user_id, email, role, exp_timestamp);
        let key: EncodingKey = EncodingKey::from_secret(secrets.get(token_type).as_ref());
        encode(&header, &claims, &key)
    }

    /// Checks the credentials, issues a token pair and remembers the refresh token.
    pub async fn login(req: LoginUserRequest, pool: &PGPool, secrets: &JwtSecrets) -> Result<LoginResponse, ApiError> {
        let invalid = || ApiError::unauthorized("invalid email or password");
        let user = db::user::get_by_email(req.email.trim(), pool)
            .await?
            .ok_or_else(invalid)?;
        if !crypto::verify_password(&req.password, &user.pwd_hash) {
            return Err(invalid());
        }

        let token = create(&TokenType::Access, &user.id, &user.email, user.role, ACCESS_TOKEN_EXP, secrets)
            .map_err(signing_error)?;
        let refresh_token = create(&TokenType::Refresh, &user.id, &user.email, user.role, REFRESH_TOKEN_EXP, secrets)
            .map_err(signing_error)?;
        let updated_user_fields = UpdateUserDto {
            refresh_token: Some(refresh_token.clone()),
            last_login: Some(Utc::now()),
            ..Default::default()
        };
        db::user::set_fields(user.id, updated_user_fields, pool).await?;
        info!("user {} logged in", user.id);

        Ok(LoginResponse {
            token,
            refresh_token,
            user: user.into(),
        })
    }

    /// Resolves an access token to the profile of its owner.
    pub async fn verify(token: Option<String>, pool: &PGPool, secrets: &JwtSecrets) -> Result<UserProfile, ApiError> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::bad_request("token was not provided"))?;
        let claims = decode_claims(&TokenType::Access, token.trim(), secrets)?.claims;
        db::user::get_profile(claims.user_id, pool)
            .await?
            .ok_or_else(|| ApiError::not_found("user not found"))
    }

    /// Exchanges the stored refresh token for a new access token.
    pub async fn refresh(token: Option<String>, pool: &PGPool, secrets: &JwtSecrets) -> Result<String, ApiError> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::bad_request("refresh token was not provided"))?;
        let token = token.trim();
        let claims = decode_claims(&TokenType::Refresh, token, secrets)?.claims;
        let user = db::user::get_by_id(claims.user_id, pool)
            .await?
            .ok_or_else(|| ApiError::unauthorized("user no longer exists"))?;
        if user.refresh_token.as_deref() != Some(token) {
            return Err(ApiError::unauthorized("refresh token was revoked"));
        }
        create(&TokenType::Access, &user.id, &user.email, user.role, ACCESS_TOKEN_EXP, secrets)
            .map_err(signing_error)
    }

    fn signing_error(err: Error) -> ApiError {
        ApiError::Internal(format!("failed to sign token: {err}"))
    }

    /// Extracts the token after `prefix` from the `Authorization` header.
    /// `Ok(None)` when there is no header at all.
    pub fn parse_request(headers: &HeaderMap, prefix: &str) -> Result<Option<String>, ApiError> {
        let Some(auth_header) = headers.get(AUTHORIZATION) else {
            return Ok(None);
        };
        let malformed = || ApiError::unauthorized("missing or malformed token");
        let auth_value = auth_header.to_str().map_err(|_| malformed())?;
        let token = auth_value.strip_prefix(prefix).map(str::trim).ok_or_else(malformed)?;
        if token.is_empty() {
            return Err(malformed());
        }
        Ok(Some(token.to_string()))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use actix_web::http::header::HeaderValue;

        fn secrets() -> JwtSecrets {
            JwtSecrets::new("access-secret", "refresh-secret")
        }

        #[test]
        fn created_token_decodes_with_same_secret() {
            let user_id = Uuid::new_v4();
            let token = create(&TokenType::Access, &user_id, "a@corp.io", Role::Manager, 60, &secrets()).unwrap();
            let claims = decode_claims(&TokenType::Access, &token, &secrets()).unwrap().claims;
            assert_eq!(claims.user_id, user_id);
            assert_eq!(claims.email, "a@corp.io");
            assert_eq!(claims.role, Role::Manager);
        }

        #[test]
        fn access_token_is_not_a_refresh_token() {
            let token = create(&TokenType::Access, &Uuid::new_v4(), "a@corp.io", Role::Employee, 60, &secrets()).unwrap();
            assert!(decode_claims(&TokenType::Refresh, &token, &secrets()).is_err());
        }

        #[test]
        fn expired_token_is_rejected() {
            let key = EncodingKey::from_secret(b"access-secret");
            // well past the default 60s leeway
            let exp = (Utc::now().timestamp() - 3600) as usize;
            let claims = Claims::new(&Uuid::new_v4(), "a@corp.io", Role::Employee, exp);
            let token = encode(&Header::new(Algorithm::HS256), &claims, &key).unwrap();
            let err = decode_claims(&TokenType::Access, &token, &secrets()).unwrap_err();
            assert_eq!(ApiError::from(err), ApiError::unauthorized("token expired"));
        }

        #[test]
        fn parse_request_handles_missing_and_malformed_headers() {
            let mut headers = HeaderMap::new();
            assert_eq!(parse_request(&headers, "Bearer ").unwrap(), None);

            headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
            assert!(parse_request(&headers, "Bearer ").is_err());

            headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
            assert!(parse_request(&headers, "Bearer ").is_err());

            headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
            assert_eq!(parse_request(&headers, "Bearer ").unwrap(), Some("abc.def".to_string()));
        }

        #[test]
        fn secrets_are_not_printed() {
            assert_eq!(format!("{:?}", secrets()), "JwtSecrets { .. }");
        }
    }
}

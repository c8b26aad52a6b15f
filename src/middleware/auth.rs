//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de usuarios autenticados. El rol del actor se relee
//! siempre de la base de datos: el rol afirmado por el cliente es
//! solo informativo.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    models::user::{User, UserRole},
    state::AppState,
    utils::errors::AppError,
    utils::jwt,
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub name: String,
    pub role: UserRole,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = jwt::extract_token_from_header(auth_header)?;

    // Decodificar y validar JWT
    let claims = jwt::verify_token(token, &jwt::JwtConfig::from(&state.config))?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))?;

    // Verificar que el usuario existe en la base de datos
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    let role = user
        .role()
        .ok_or_else(|| AppError::Internal(format!("Rol desconocido: {}", user.role)))?;

    // Inyectar usuario autenticado en las extensions
    let authenticated_user = AuthenticatedUser {
        user_id: user.id,
        name: user.name,
        role,
    };
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

//! `/users` routes: registration, login and avatar upload.

use super::dto::{CreateUserDto, LoginUserDto};
use super::rdo::{LoggedUserRdo, UserRdo};
use super::UserService;
use http::Method;
use sixcities_auth::TokenService;
use sixcities_core::{AppError, RequestContext, StepResult};
use sixcities_middleware::{AuthGuard, FileStorage, UploadFileMiddleware};
use sixcities_server::{Controller, RouteError};
use std::sync::Arc;

const AVATAR_FIELD: &str = "avatar";

/// Handlers for account management.
pub struct UserController {
    users: Arc<UserService>,
    tokens: Arc<TokenService>,
    storage: Arc<dyn FileStorage>,
}

impl UserController {
    /// Creates the controller. Avatars are written to `storage`.
    pub fn new(
        users: Arc<UserService>,
        tokens: Arc<TokenService>,
        storage: Arc<dyn FileStorage>,
    ) -> Arc<Self> {
        Arc::new(Self {
            users,
            tokens,
            storage,
        })
    }

    /// Registers the routes under `/users`.
    pub fn controller(self: &Arc<Self>) -> Result<Controller, RouteError> {
        let mut controller = Controller::new("/users");

        let this = Arc::clone(self);
        controller.add_route(
            Method::POST,
            "/register",
            move |ctx| Box::pin(Arc::clone(&this).register(ctx)),
            Vec::new(),
        )?;

        let this = Arc::clone(self);
        controller.add_route(
            Method::POST,
            "/login",
            move |ctx| Box::pin(Arc::clone(&this).login(ctx)),
            Vec::new(),
        )?;

        let this = Arc::clone(self);
        controller.add_route(
            Method::POST,
            "/avatar",
            move |ctx| Box::pin(Arc::clone(&this).avatar(ctx)),
            vec![
                Arc::new(AuthGuard::new()),
                Arc::new(UploadFileMiddleware::new(
                    Arc::clone(&self.storage),
                    AVATAR_FIELD,
                )),
            ],
        )?;

        Ok(controller)
    }

    async fn register(self: Arc<Self>, ctx: &mut RequestContext) -> StepResult {
        let dto: CreateUserDto = ctx.json()?;
        dto.validate()?;

        let user = self.users.create(dto)?;
        tracing::info!(user_id = %user.id, "user registered");
        Controller::created(ctx, &UserRdo::from(&user))?;
        Ok(())
    }

    async fn login(self: Arc<Self>, ctx: &mut RequestContext) -> StepResult {
        let dto: LoginUserDto = ctx.json()?;

        let user = self.users.find_by_email(&dto.email).ok_or_else(|| {
            AppError::unauthorized(format!("User with email {} not found.", dto.email))
                .with_origin("UserController")
        })?;

        if !self.users.verify_password(&user, &dto.password) {
            return Err(AppError::unauthorized("Password is incorrect")
                .with_origin("UserController")
                .into());
        }

        let token = self.tokens.sign(&user.token_subject())?;
        tracing::debug!(user_id = %user.id, "login succeeded");

        let body = LoggedUserRdo {
            token,
            email: user.email,
            avatar: user.avatar,
            name: user.name,
            user_type: user.user_type,
        };
        Controller::ok(ctx, &body)?;
        Ok(())
    }

    async fn avatar(self: Arc<Self>, ctx: &mut RequestContext) -> StepResult {
        let user_id = ctx
            .identity()
            .map(|identity| identity.id().to_string())
            .ok_or_else(|| AppError::unauthorized("User is not authenticated").with_origin("UserController"))?;
        let filename = ctx
            .uploaded_file()
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::bad_request("Avatar file is required").with_origin("UserController")
            })?;

        let user = self.users.update_avatar(&user_id, &filename).ok_or_else(|| {
            AppError::not_found(format!("User with id {user_id} not found"))
                .with_origin("UserController")
        })?;
        tracing::info!(user_id = %user.id, avatar = %filename, "avatar updated");

        Controller::ok(ctx, &UserRdo::from(&user))?;
        Ok(())
    }
}

impl std::fmt::Debug for UserController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserController")
            .field("users", &self.users)
            .finish_non_exhaustive()
    }
}

use std::sync::Arc;
use tokio::sync::Mutex;
use typed_mediator::{
    async_trait, AsyncHandlerRegistration, AsyncMediator, AsyncNotificationHandler,
    AsyncRequestHandler, DefaultAsyncMediator, HandlerResult, Notification, Request,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct User {
    id: Uuid,
    name: String,
}

type SharedUsers = Arc<Mutex<Vec<User>>>;

struct CreateUserRequest(String);
impl Request for CreateUserRequest {
    type Response = User;
}

struct GetAllUsersRequest;
impl Request for GetAllUsersRequest {
    type Response = Vec<User>;
}

struct UserCreatedEvent(User);
impl Notification for UserCreatedEvent {}

struct CreateUserRequestHandler(SharedUsers);

#[async_trait]
impl AsyncRequestHandler for CreateUserRequestHandler {
    type Request = CreateUserRequest;

    async fn handle(&self, req: CreateUserRequest) -> HandlerResult<User> {
        if req.0.trim().is_empty() {
            return Err("user name must not be empty".into());
        }

        let user = User {
            id: Uuid::new_v4(),
            name: req.0,
        };
        self.0.lock().await.push(user.clone());
        Ok(user)
    }
}

struct GetAllUsersRequestHandler(SharedUsers);

#[async_trait]
impl AsyncRequestHandler for GetAllUsersRequestHandler {
    type Request = GetAllUsersRequest;

    async fn handle(&self, _: GetAllUsersRequest) -> HandlerResult<Vec<User>> {
        Ok(self.0.lock().await.clone())
    }
}

struct UserCounter(Arc<Mutex<usize>>);

#[async_trait]
impl AsyncNotificationHandler for UserCounter {
    type Notification = UserCreatedEvent;

    async fn handle(&self, event: &UserCreatedEvent) -> HandlerResult<()> {
        println!("User created: {:?}", event.0.name);
        *self.0.lock().await += 1;
        Ok(())
    }
}

fn handlers(users: SharedUsers, total: Arc<Mutex<usize>>) -> Vec<AsyncHandlerRegistration> {
    vec![
        AsyncHandlerRegistration::request(CreateUserRequestHandler(users.clone())),
        AsyncHandlerRegistration::request(GetAllUsersRequestHandler(users)),
        AsyncHandlerRegistration::notification(UserCounter(total)),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let users = SharedUsers::default();
    let total_users = Arc::new(Mutex::new(0_usize));

    let mediator = DefaultAsyncMediator::builder()
        .discover(handlers(users, total_users.clone()))
        .build()?;

    for name in ["John", "Jane", ""] {
        match mediator.send(CreateUserRequest(name.to_owned())).await {
            Ok(user) => mediator.publish(UserCreatedEvent(user)).await?,
            Err(err) => log::error!("could not create user: {}", err),
        }
    }

    let users = mediator.send(GetAllUsersRequest).await?;
    for user in &users {
        println!("{} {}", user.id, user.name);
    }
    println!("Total users: {}", total_users.lock().await);

    Ok(())
}

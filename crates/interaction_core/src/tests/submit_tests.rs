use super::*;

fn payload() -> ContactPayload {
    ContactPayload {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        message: "Hello".into(),
    }
}

#[tokio::test]
async fn logging_submitter_always_accepts() {
    LoggingSubmitter
        .submit(&payload())
        .await
        .expect("logging submitter accepts");
}

#[tokio::test]
async fn boxed_submitter_delegates() {
    let boxed: Box<dyn ContactSubmitter> = Box::new(LoggingSubmitter);
    assert_eq!(boxed.submit(&payload()).await, Ok(()));
}

#[cfg(feature = "http-submit")]
mod http {
    use std::sync::{Arc, Mutex};

    use anyhow::Result;
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use tokio::net::TcpListener;

    use super::*;

    #[derive(Clone)]
    struct ContactServer {
        status: StatusCode,
        received: Arc<Mutex<Vec<ContactPayload>>>,
    }

    async fn handle_contact(
        State(server): State<ContactServer>,
        Json(body): Json<ContactPayload>,
    ) -> StatusCode {
        server.received.lock().expect("received lock").push(body);
        server.status
    }

    async fn spawn_contact_server(status: StatusCode) -> Result<(String, ContactServer)> {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = ContactServer {
            status,
            received: Arc::new(Mutex::new(Vec::new())),
        };
        let app = Router::new()
            .route("/contact", post(handle_contact))
            .with_state(server.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok((format!("http://{addr}/contact"), server))
    }

    #[tokio::test]
    async fn posts_payload_as_json() {
        let (endpoint, server) = spawn_contact_server(StatusCode::NO_CONTENT)
            .await
            .expect("server");
        let submitter = HttpSubmitter::new(endpoint);

        submitter.submit(&payload()).await.expect("delivered");
        let received = server.received.lock().expect("received lock").clone();
        assert_eq!(received, vec![payload()]);
    }

    #[tokio::test]
    async fn non_success_status_is_rejected() {
        let (endpoint, _server) = spawn_contact_server(StatusCode::INTERNAL_SERVER_ERROR)
            .await
            .expect("server");
        let result = HttpSubmitter::new(endpoint).submit(&payload()).await;
        assert_eq!(result, Err(SubmitError::Rejected { status: 500 }));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let result = HttpSubmitter::new(format!("http://{addr}/contact"))
            .submit(&payload())
            .await;
        assert!(matches!(result, Err(SubmitError::Transport(_))));
    }
}

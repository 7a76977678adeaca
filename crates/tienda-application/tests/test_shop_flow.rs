use std::sync::Arc;

use async_trait::async_trait;
use tienda_application::{NoticeLevel, ShopService, UserAction};
use tienda_core::catalog::CatalogStore;
use tienda_core::config::ShopConfig;
use tienda_core::engine::{EngineError, ReasoningEngine};
use tienda_core::session::{ChatMessage, MessageRole};
use tienda_infrastructure::FileCsvFeed;

const CATALOG: &str = "ID_SKU,Producto,Precio_Lista,Disponibilidad\n\
                       A1,Perfil C,200,Alta\n\
                       B2,Malla 6mm,300,\n\
                       007,Chapa 10mm,1500,Baja\n";

/// Fails on the second call, succeeds otherwise.
struct FlakyEngine {
    calls: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl ReasoningEngine for FlakyEngine {
    async fn complete(&self, briefing: &str, history: &[ChatMessage]) -> Result<String, EngineError> {
        let n = self
            .calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if n == 1 {
            return Err(EngineError::ProcessError {
                status_code: Some(429),
                message: "RESOURCE_EXHAUSTED".to_string(),
                is_retryable: true,
                retry_after: None,
            });
        }
        assert!(briefing.contains("BASE DE DATOS:\nID_SKU,Producto,Precio_Lista,Disponibilidad\n"));
        assert_eq!(history.last().map(|m| m.role), Some(MessageRole::User));
        Ok(format!("Respuesta {n}"))
    }

    fn describe(&self) -> String {
        "flaky".to_string()
    }
}

fn shop(path: &std::path::Path) -> ShopService {
    let config = ShopConfig::default();
    let store = Arc::new(CatalogStore::new(
        Arc::new(FileCsvFeed::new(path)),
        config.feed.columns.clone(),
        config.feed.refresh_interval(),
    ));
    let engine: Arc<dyn ReasoningEngine> = Arc::new(FlakyEngine {
        calls: Default::default(),
    });
    ShopService::new(store, Ok(engine), &config).unwrap()
}

#[tokio::test]
async fn test_browse_add_chat_checkout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalogo.csv");
    std::fs::write(&path, CATALOG).unwrap();
    let service = shop(&path);
    let session = service.sessions().create().await;

    let view = service
        .dispatch(&session, UserAction::Search(String::new()))
        .await;
    let page = view.catalog.unwrap();
    assert_eq!(page.total_matches, 3);
    let skus: Vec<&str> = page.cards.iter().map(|c| c.sku.as_str()).collect();
    assert_eq!(skus, vec!["A1", "B2", "007"]);

    let generation = page.generation;
    service
        .dispatch(&session, UserAction::Add { row: 2, generation })
        .await;
    service
        .dispatch(&session, UserAction::Add { row: 1, generation })
        .await;

    let view = service
        .dispatch(&session, UserAction::SendMessage("¿Me falta algo?".into()))
        .await;
    assert_eq!(view.last_reply().unwrap().content, "Respuesta 0");
    assert_eq!(view.reply.as_deref(), Some("Respuesta 0"));

    // The engine fails this time: apology notice, transcript unchanged.
    let view = service
        .dispatch(&session, UserAction::SendMessage("¿Y alambre?".into()))
        .await;
    assert_eq!(view.transcript.len(), 3);
    assert!(view.reply.is_none());
    assert_eq!(view.notices.len(), 1);
    assert_eq!(view.notices[0].level, NoticeLevel::Warning);
    assert_eq!(
        view.notices[0].text,
        "Lucho está descansando un segundo. Intentá de nuevo."
    );

    let view = service
        .dispatch(&session, UserAction::SendMessage("¿Y alambre?".into()))
        .await;
    assert_eq!(view.transcript.len(), 5);

    let view = service.dispatch(&session, UserAction::Checkout).await;
    assert_eq!(view.cart.order_text, "- Chapa 10mm ($1500)\n- Malla 6mm ($300)\n");
    assert_eq!(view.cart.estimate.amount, 1800.0);
    let handoff = view.cart.handoff.unwrap();
    assert_eq!(
        handoff.message,
        "Hola Martín! Quiero comprar esto que armé en la web:\n\
         - Chapa 10mm ($1500)\n- Malla 6mm ($300)\n\n\
         Revisame el stock y precio final."
    );
    assert!(handoff.url.contains("%0A-%20Chapa%2010mm%20%28%241500%29%0A"));

    assert!(service.sessions().end(session.id()).await.is_some());
}

#[tokio::test]
async fn test_on_demand_refresh_picks_up_new_rows_without_touching_cart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalogo.csv");
    std::fs::write(&path, CATALOG).unwrap();
    let service = shop(&path);
    let session = service.sessions().create().await;

    let view = service
        .dispatch(&session, UserAction::Search(String::new()))
        .await;
    let first = view.catalog.unwrap();
    service
        .dispatch(
            &session,
            UserAction::Add {
                row: 0,
                generation: first.generation,
            },
        )
        .await;

    std::fs::write(&path, "ID_SKU,Producto,Precio_Lista\nZ9,Tornillo,5\n").unwrap();
    let view = service.dispatch(&session, UserAction::RefreshCatalog).await;

    let page = view.catalog.unwrap();
    assert_eq!(page.cards.len(), 1);
    assert_eq!(page.cards[0].stock, "Consultar");
    assert_ne!(page.generation, first.generation);
    assert_eq!(view.cart.items[0].name, "Perfil C");

    // Row 0 of the old listing was "Perfil C"; it must not add "Tornillo".
    let view = service
        .dispatch(
            &session,
            UserAction::Add {
                row: 0,
                generation: first.generation,
            },
        )
        .await;
    assert_eq!(view.cart.count(), 1);
    assert_eq!(view.notices[0].level, NoticeLevel::Warning);
}

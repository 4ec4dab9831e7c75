// tests/api.rs
//
// Testes de ponta a ponta: montam o router real (com um armazenamento novo
// por teste) e dirigem requisições HTTP com `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use pingdesk_backend::{build_router, config::AppState};

const ADMIN_EMAIL: &str = "admin@pingdesk.com";
const ADMIN_PASSWORD: &str = "admin123";

async fn app() -> Router {
    let state = AppState::build("segredo-de-teste".to_owned());
    state
        .auth_service
        .bootstrap_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("bootstrap do admin");
    build_router(state)
}

async fn request(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("requisição"),
        None => builder.body(Body::empty()).expect("requisição"),
    };

    let response = app.clone().oneshot(request).await.expect("resposta");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("corpo").to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login de {}: {:?}", email, body);
    body["token"].as_str().expect("token").to_owned()
}

// Cria um vendedor via admin e devolve (id, token do vendedor).
async fn create_salesperson(app: &Router, admin_token: &str, name: &str, email: &str) -> (u64, String) {
    let (status, body) = request(
        app,
        "POST",
        "/api/users",
        Some(admin_token),
        Some(json!({
            "name": name,
            "email": email,
            "password": "senha-forte",
            "role": "salesperson",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "criação de {}: {:?}", email, body);
    let id = body["id"].as_u64().expect("id do vendedor");
    let token = login(app, email, "senha-forte").await;
    (id, token)
}

#[tokio::test]
async fn health_e_protecao_por_token() {
    let app = app().await;

    let (status, _) = request(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(&app, "GET", "/api/proposals", Some("token-invalido"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_e_me() {
    let app = app().await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": "senha-errada" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, body) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    assert_eq!(body["email"], ADMIN_EMAIL);
    // O hash de senha nunca sai na resposta.
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn gestao_de_usuarios_e_exclusiva_de_admin() {
    let app = app().await;
    let admin_token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (_sp_id, sp_token) = create_salesperson(&app, &admin_token, "Ana", "ana@pingdesk.com").await;

    // Vendedor não lista nem cria usuários.
    let (status, _) = request(&app, "GET", "/api/users", Some(&sp_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Campos obrigatórios ausentes.
    let (status, _) = request(
        &app,
        "POST",
        "/api/users",
        Some(&admin_token),
        Some(json!({ "name": "Sem Email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // E-mail duplicado.
    let (status, _) = request(
        &app,
        "POST",
        "/api/users",
        Some(&admin_token),
        Some(json!({
            "name": "Outra Ana",
            "email": "ana@pingdesk.com",
            "password": "senha-forte",
            "role": "salesperson",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // O admin (id 1, bootstrap) não pode excluir a si mesmo.
    let (status, _) = request(&app, "DELETE", "/api/users/1", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fluxo_de_proposta_com_historico() {
    let app = app().await;
    let admin_token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (_ana_id, ana_token) = create_salesperson(&app, &admin_token, "Ana", "ana@pingdesk.com").await;
    let (_beto_id, beto_token) =
        create_salesperson(&app, &admin_token, "Beto", "beto@pingdesk.com").await;

    // Admin não cria proposta.
    let (status, _) = request(
        &app,
        "POST",
        "/api/proposals",
        Some(&admin_token),
        Some(json!({ "provider": "Acme", "status": "inicio", "description": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Campos obrigatórios.
    let (status, _) = request(
        &app,
        "POST",
        "/api/proposals",
        Some(&ana_token),
        Some(json!({ "provider": "Acme" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Criação semeia o histórico.
    let (status, proposal) = request(
        &app,
        "POST",
        "/api/proposals",
        Some(&ana_token),
        Some(json!({
            "provider": "Acme",
            "status": "inicio",
            "description": "first contact",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = proposal["id"].as_u64().expect("id");
    let history = proposal["descriptionHistory"].as_array().expect("histórico");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["description"], "first contact");
    assert_eq!(history[0]["status"], "inicio");

    // Outro vendedor não enxerga nem muta.
    let path = format!("/api/proposals/{}", id);
    let (status, _) = request(&app, "GET", &path, Some(&beto_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = request(
        &app,
        "PUT",
        &path,
        Some(&beto_token),
        Some(json!({ "description": "invasão" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin enxerga tudo.
    let (status, list) = request(&app, "GET", "/api/proposals", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().expect("lista").len(), 1);

    // Descrição nova + status novo: uma entrada a mais, com o status novo.
    let (status, updated) = request(
        &app,
        "PUT",
        &path,
        Some(&ana_token),
        Some(json!({ "description": "sent quote", "status": "negociando" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "negociando");
    let history = updated["descriptionHistory"].as_array().expect("histórico");
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["description"], "sent quote");
    assert_eq!(history[1]["status"], "negociando");

    // Fechar sem plano é recusado na borda.
    let (status, _) = request(
        &app,
        "PUT",
        &path,
        Some(&ana_token),
        Some(json!({ "status": "concluido-sucesso" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Com plano e valor, fecha.
    let (status, closed) = request(
        &app,
        "PUT",
        &path,
        Some(&ana_token),
        Some(json!({
            "status": "concluido-sucesso",
            "planClosed": "Plano 500MB",
            "planValue": 1000.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["status"], "concluido-sucesso");

    // Comissão: 80% para o vendedor, 100% para o admin.
    let (status, stats) = request(&app, "GET", "/api/dashboard/stats", Some(&ana_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalProposals"], 1);
    assert_eq!(stats["closedDeals"], 1);
    assert_eq!(stats["totalValue"], 1000.0);
    assert_eq!(stats["commission"], 800.0);
    assert_eq!(stats["monthlyStats"].as_array().expect("meses").len(), 6);

    let (_, stats) = request(&app, "GET", "/api/dashboard/stats", Some(&admin_token), None).await;
    assert_eq!(stats["commission"], 1000.0);

    // Beto não vê nada no dashboard dele.
    let (_, stats) = request(&app, "GET", "/api/dashboard/stats", Some(&beto_token), None).await;
    assert_eq!(stats["totalProposals"], 0);

    // Exclusão pelo dono; depois o id não resolve mais.
    let (status, _) = request(&app, "DELETE", &path, Some(&ana_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = request(&app, "GET", &path, Some(&ana_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn lead_converte_no_maximo_uma_vez() {
    let app = app().await;
    let admin_token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (_sp_id, sp_token) = create_salesperson(&app, &admin_token, "Ana", "ana@pingdesk.com").await;

    let (status, lead) = request(
        &app,
        "POST",
        "/api/leads",
        Some(&sp_token),
        Some(json!({
            "provider": "NetFibra",
            "contact": "11 99999-0000",
            "website": "netfibra.com.br",
            "state": "SP",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(lead["convertedToProposal"], false);
    let id = lead["id"].as_u64().expect("id do lead");

    let convert_path = format!("/api/leads/{}/convert", id);
    let (status, converted) = request(&app, "POST", &convert_path, Some(&sp_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let proposal_id = converted["proposalId"].as_u64().expect("proposalId");

    // A proposta gerada nasce em "inicio" e pertence ao vendedor.
    let (status, proposal) = request(
        &app,
        "GET",
        &format!("/api/proposals/{}", proposal_id),
        Some(&sp_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(proposal["status"], "inicio");
    assert_eq!(proposal["provider"], "NetFibra");

    // Segunda conversão falha e o vínculo não muda.
    let (status, _) = request(&app, "POST", &convert_path, Some(&sp_token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, leads) = request(&app, "GET", "/api/leads", Some(&sp_token), None).await;
    let lead = &leads.as_array().expect("leads")[0];
    assert_eq!(lead["convertedToProposal"], true);
    assert_eq!(lead["proposalId"].as_u64(), Some(proposal_id));

    // Admin não converte lead.
    let (status, _) = request(&app, "POST", &convert_path, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn reuniao_pertence_ao_dono_da_proposta() {
    let app = app().await;
    let admin_token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (ana_id, ana_token) = create_salesperson(&app, &admin_token, "Ana", "ana@pingdesk.com").await;
    let (_beto_id, beto_token) =
        create_salesperson(&app, &admin_token, "Beto", "beto@pingdesk.com").await;

    let (_, proposal) = request(
        &app,
        "POST",
        "/api/proposals",
        Some(&ana_token),
        Some(json!({ "provider": "Acme", "status": "inicio", "description": "primeiro contato" })),
    )
    .await;
    let proposal_id = proposal["id"].as_u64().expect("id");

    // Campos obrigatórios.
    let (status, _) = request(
        &app,
        "POST",
        "/api/meetings",
        Some(&admin_token),
        Some(json!({ "proposalId": proposal_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Proposta inexistente.
    let (status, _) = request(
        &app,
        "POST",
        "/api/meetings",
        Some(&admin_token),
        Some(json!({
            "proposalId": 999,
            "date": "2026-09-01",
            "time": "14:30",
            "type": "call",
            "contact": "11 98888-0000",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Admin cria em nome do vendedor: a reunião sai com o dono da proposta.
    let tomorrow = (Utc::now().date_naive() + Duration::days(1)).to_string();
    let (status, meeting) = request(
        &app,
        "POST",
        "/api/meetings",
        Some(&admin_token),
        Some(json!({
            "proposalId": proposal_id,
            "date": tomorrow,
            "time": "14:30",
            "type": "call",
            "contact": "11 98888-0000",
            "notes": "levar contrato",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(meeting["salespersonId"].as_u64(), Some(ana_id));
    let meeting_id = meeting["id"].as_u64().expect("id");

    // Beto não cria reunião na proposta da Ana, nem muta a reunião dela.
    let (status, _) = request(
        &app,
        "POST",
        "/api/meetings",
        Some(&beto_token),
        Some(json!({
            "proposalId": proposal_id,
            "date": tomorrow,
            "time": "16:00",
            "type": "video",
            "contact": "x",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/meetings/{}", meeting_id),
        Some(&beto_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A agenda da Ana mostra a reunião com o provedor da proposta.
    let (status, upcoming) =
        request(&app, "GET", "/api/meetings/upcoming", Some(&ana_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let upcoming = upcoming.as_array().expect("agenda");
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0]["provider"], "Acme");
    assert_eq!(upcoming[0]["type"], "call");

    // Beto não vê a agenda da Ana.
    let (_, upcoming) = request(&app, "GET", "/api/meetings/upcoming", Some(&beto_token), None).await;
    assert_eq!(upcoming.as_array().expect("agenda").len(), 0);

    // A dona atualiza e exclui.
    let (status, updated) = request(
        &app,
        "PUT",
        &format!("/api/meetings/{}", meeting_id),
        Some(&ana_token),
        Some(json!({
            "proposalId": proposal_id,
            "date": tomorrow,
            "time": "15:00",
            "type": "whatsapp",
            "contact": "11 98888-0000",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["time"], "15:00");
    assert_eq!(updated["salespersonId"].as_u64(), Some(ana_id));

    let (status, body) = request(
        &app,
        "DELETE",
        &format!("/api/meetings/{}", meeting_id),
        Some(&ana_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

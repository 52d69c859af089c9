//! HTTP API
//!
//! # Endpoints
//!
//! - `POST /path` - Minimal route query, `{path: [...]}` or `{path: null}`
//! - `POST /route` - Route with cost, floor segments and instructions
//! - `GET /rooms`, `GET /floors` - Selectable endpoints and floor labels
//! - `GET /map`, `PUT /map`, `POST /refresh` - Export, replace, reload
//! - `GET /version` - Change counter for client polling
//! - `/nodes`, `/edges`, `/floors` - Editor operations
//! - `GET /health` - Health check
//! - `GET /swagger-ui` - OpenAPI documentation

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;
use wayfind_graph::{default_node_name, Access, Edge, MapDocument, Node, NodeKind, NodePatch, Report};
use wayfind_route::{FloorSegment, Instruction, PathEngine, QueryError, Role, RoutePlan};

use crate::error::{ApiError, ErrorResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        find_path,
        plan_route,
        list_rooms,
        list_floors,
        get_map,
        put_map,
        refresh,
        version,
        add_node,
        update_node,
        remove_node,
        connect,
        disconnect,
        add_floor,
        remove_floor,
        set_floor_label,
        health
    ),
    components(schemas(
        PathRequest,
        PathResponse,
        RoutePlan,
        FloorSegment,
        Instruction,
        Role,
        RoomEntry,
        FloorEntry,
        LoadSummary,
        Report,
        VersionResponse,
        NewNode,
        Node,
        NodeKind,
        Access,
        NodePatch,
        Edge,
        RemovedResponse,
        FloorResponse,
        LabelRequest,
        HealthResponse,
        ErrorResponse
    )),
    tags(
        (name = "routing", description = "Route queries"),
        (name = "map", description = "Map document and floors"),
        (name = "editor", description = "Map editing")
    )
)]
struct ApiDoc;

/// Build the router with all endpoints
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/path", post(find_path))
        .route("/route", post(plan_route))
        .route("/rooms", get(list_rooms))
        .route("/floors", get(list_floors).post(add_floor))
        .route("/floors/{floor}", delete(remove_floor))
        .route("/floors/{floor}/label", put(set_floor_label))
        .route("/map", get(get_map).put(put_map))
        .route("/refresh", post(refresh))
        .route("/version", get(version))
        .route("/nodes", post(add_node))
        .route("/nodes/{id}", patch(update_node).delete(remove_node))
        .route("/edges", post(connect).delete(disconnect))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ============ Routing ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct PathRequest {
    #[schema(example = "R-1-101")]
    pub start: String,
    #[schema(example = "R-2-201")]
    pub end: String,
    /// student, pwd-student, employee or admin
    #[schema(example = "student")]
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PathResponse {
    /// Node ids from start to end, or null when there is no route
    pub path: Option<Vec<String>>,
}

#[utoipa::path(
    post,
    path = "/path",
    request_body = PathRequest,
    responses(
        (status = 200, description = "Route or null", body = PathResponse),
        (status = 400, description = "Start equals end", body = ErrorResponse)
    ),
    tag = "routing"
)]
async fn find_path(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PathRequest>,
) -> Result<Json<PathResponse>, ApiError> {
    if req.start == req.end {
        return Err(QueryError::SameEndpoint.into());
    }

    let graph = state.read();
    let route = PathEngine::new(&graph).find_path_by_role_name(&req.start, &req.end, &req.role);
    tracing::debug!(
        start = %req.start,
        end = %req.end,
        role = %req.role,
        found = route.is_some(),
        "path query"
    );
    Ok(Json(PathResponse {
        path: route.map(|r| r.nodes),
    }))
}

#[utoipa::path(
    post,
    path = "/route",
    request_body = PathRequest,
    responses(
        (status = 200, description = "Route found", body = RoutePlan),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 404, description = "No route for this role", body = ErrorResponse)
    ),
    tag = "routing"
)]
async fn plan_route(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PathRequest>,
) -> Result<Json<RoutePlan>, ApiError> {
    let graph = state.read();
    let plan = PathEngine::new(&graph).plan_by_role_name(&req.start, &req.end, &req.role)?;
    plan.map(Json).ok_or(ApiError::NoRoute)
}

// ============ Map ============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomEntry {
    pub id: String,
    pub name: String,
    pub floor: u32,
    pub floor_label: String,
}

#[utoipa::path(
    get,
    path = "/rooms",
    responses((status = 200, description = "Rooms sorted by floor, then name", body = Vec<RoomEntry>)),
    tag = "map"
)]
async fn list_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomEntry>> {
    let graph = state.read();
    let rooms = graph
        .rooms()
        .into_iter()
        .map(|n| RoomEntry {
            id: n.id.clone(),
            name: n.display_name().to_string(),
            floor: n.floor,
            floor_label: graph.floor_label(n.floor).into_owned(),
        })
        .collect();
    Json(rooms)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FloorEntry {
    pub floor: u32,
    pub label: String,
}

#[utoipa::path(
    get,
    path = "/floors",
    responses((status = 200, description = "Floors in ascending order", body = Vec<FloorEntry>)),
    tag = "map"
)]
async fn list_floors(State(state): State<Arc<AppState>>) -> Json<Vec<FloorEntry>> {
    let graph = state.read();
    let floors = graph
        .floors()
        .into_iter()
        .map(|floor| FloorEntry {
            floor,
            label: graph.floor_label(floor).into_owned(),
        })
        .collect();
    Json(floors)
}

#[utoipa::path(
    get,
    path = "/map",
    responses((status = 200, description = "Current map document `{nodes, edges, floorLabels}`")),
    tag = "map"
)]
async fn get_map(State(state): State<Arc<AppState>>) -> Json<MapDocument> {
    Json(state.read().to_document())
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    pub last_updated: u64,
    pub report: Report,
}

#[utoipa::path(
    put,
    path = "/map",
    request_body(content = String, description = "Map document `{nodes, edges, floorLabels}`", content_type = "application/json"),
    responses(
        (status = 200, description = "Map replaced", body = LoadSummary),
        (status = 400, description = "Invalid map data; nothing changed", body = ErrorResponse)
    ),
    tag = "map"
)]
async fn put_map(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<LoadSummary>, ApiError> {
    let doc = MapDocument::from_json_value(body)?;
    let report = state.replace(doc)?;
    Ok(Json(LoadSummary {
        last_updated: state.read().revision(),
        report,
    }))
}

#[utoipa::path(
    post,
    path = "/refresh",
    responses(
        (status = 200, description = "Map reloaded from disk", body = LoadSummary),
        (status = 400, description = "Invalid map data; nothing changed", body = ErrorResponse),
        (status = 409, description = "No map file configured", body = ErrorResponse)
    ),
    tag = "map"
)]
async fn refresh(State(state): State<Arc<AppState>>) -> Result<Json<LoadSummary>, ApiError> {
    let report = state.reload().ok_or(ApiError::NoMapFile)??;
    if let Some(path) = state.map_path() {
        tracing::info!(path = %path.display(), "map reloaded from disk");
    }
    Ok(Json(LoadSummary {
        last_updated: state.read().revision(),
        report,
    }))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    /// Bumped by every load and edit
    pub last_updated: u64,
}

#[utoipa::path(
    get,
    path = "/version",
    responses((status = 200, description = "Current map version", body = VersionResponse)),
    tag = "map"
)]
async fn version(State(state): State<Arc<AppState>>) -> Json<VersionResponse> {
    Json(VersionResponse {
        last_updated: state.read().revision(),
    })
}

// ============ Editor ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewNode {
    /// Generated as `{K}-{floor}-{n}` when absent
    pub id: Option<String>,
    /// Defaults to the usual name for the node type
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub floor: u32,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub access: Access,
    /// Link the node to the nearest node on its floor
    #[serde(default = "default_true")]
    pub connect: bool,
}

fn default_true() -> bool {
    true
}

#[utoipa::path(
    post,
    path = "/nodes",
    request_body = NewNode,
    responses(
        (status = 201, description = "Node added", body = Node),
        (status = 400, description = "Invalid node", body = ErrorResponse),
        (status = 409, description = "Id already taken", body = ErrorResponse)
    ),
    tag = "editor"
)]
async fn add_node(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewNode>,
) -> Result<impl IntoResponse, ApiError> {
    let mut graph = state.write();
    let id = req
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| graph.next_node_id(req.kind, req.floor));
    let name = req
        .name
        .unwrap_or_else(|| default_node_name(req.kind, req.access));
    let node = Node::new(id, req.kind, req.floor, req.x, req.y)
        .with_name(name)
        .with_access(req.access);

    if req.connect {
        let linked = graph.add_node_connected(node.clone())?;
        tracing::info!(id = %node.id, linked = ?linked, "node added");
    } else {
        graph.add_node(node.clone())?;
        tracing::info!(id = %node.id, "node added");
    }
    Ok((StatusCode::CREATED, Json(node)))
}

#[utoipa::path(
    patch,
    path = "/nodes/{id}",
    params(("id" = String, Path, description = "Node id")),
    request_body = NodePatch,
    responses(
        (status = 200, description = "Node updated", body = Node),
        (status = 400, description = "Only rooms can be renamed", body = ErrorResponse),
        (status = 404, description = "Unknown node", body = ErrorResponse)
    ),
    tag = "editor"
)]
async fn update_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<NodePatch>,
) -> Result<Json<Node>, ApiError> {
    let mut graph = state.write();
    let node = graph.update_node(&id, patch)?.clone();
    tracing::info!(id = %id, "node updated");
    Ok(Json(node))
}

#[utoipa::path(
    delete,
    path = "/nodes/{id}",
    params(("id" = String, Path, description = "Node id")),
    responses(
        (status = 200, description = "Node and its edges removed", body = Node),
        (status = 404, description = "Unknown node", body = ErrorResponse)
    ),
    tag = "editor"
)]
async fn remove_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Node>, ApiError> {
    let node = state.write().remove_node(&id)?;
    tracing::info!(id = %id, "node removed");
    Ok(Json(node))
}

#[utoipa::path(
    post,
    path = "/edges",
    request_body = Edge,
    responses(
        (status = 201, description = "Edge added", body = Edge),
        (status = 400, description = "Link not allowed", body = ErrorResponse),
        (status = 404, description = "Unknown node", body = ErrorResponse)
    ),
    tag = "editor"
)]
async fn connect(
    State(state): State<Arc<AppState>>,
    Json(edge): Json<Edge>,
) -> Result<impl IntoResponse, ApiError> {
    state.write().connect(&edge.source, &edge.target)?;
    tracing::info!(source = %edge.source, target = %edge.target, "edge added");
    Ok((StatusCode::CREATED, Json(edge)))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RemovedResponse {
    pub removed: usize,
}

#[utoipa::path(
    delete,
    path = "/edges",
    request_body = Edge,
    responses((status = 200, description = "Edges between the pair removed, in either direction", body = RemovedResponse)),
    tag = "editor"
)]
async fn disconnect(
    State(state): State<Arc<AppState>>,
    Json(edge): Json<Edge>,
) -> Json<RemovedResponse> {
    let removed = state.write().disconnect(&edge.source, &edge.target);
    tracing::info!(source = %edge.source, target = %edge.target, removed, "edges removed");
    Json(RemovedResponse { removed })
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FloorResponse {
    pub floor: u32,
}

#[utoipa::path(
    post,
    path = "/floors",
    responses(
        (status = 201, description = "Floor added above the top floor", body = FloorResponse),
        (status = 409, description = "Connector id already taken", body = ErrorResponse)
    ),
    tag = "editor"
)]
async fn add_floor(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let floor = state.write().add_floor()?;
    tracing::info!(floor, "floor added");
    Ok((StatusCode::CREATED, Json(FloorResponse { floor })))
}

#[utoipa::path(
    delete,
    path = "/floors/{floor}",
    params(("floor" = u32, Path, description = "Floor number")),
    responses(
        (status = 200, description = "Floor removed; `removed` counts its nodes", body = RemovedResponse),
        (status = 400, description = "Last remaining floor", body = ErrorResponse),
        (status = 404, description = "Unknown floor", body = ErrorResponse)
    ),
    tag = "editor"
)]
async fn remove_floor(
    State(state): State<Arc<AppState>>,
    Path(floor): Path<u32>,
) -> Result<Json<RemovedResponse>, ApiError> {
    let removed = state.write().remove_floor(floor)?;
    tracing::info!(floor, removed, "floor removed");
    Ok(Json(RemovedResponse { removed }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LabelRequest {
    /// Blank restores "Floor N"
    #[schema(example = "Ground")]
    pub label: String,
}

#[utoipa::path(
    put,
    path = "/floors/{floor}/label",
    params(("floor" = u32, Path, description = "Floor number")),
    request_body = LabelRequest,
    responses((status = 200, description = "Label set", body = FloorEntry)),
    tag = "editor"
)]
async fn set_floor_label(
    State(state): State<Arc<AppState>>,
    Path(floor): Path<u32>,
    Json(req): Json<LabelRequest>,
) -> Result<Json<FloorEntry>, ApiError> {
    let mut graph = state.write();
    graph.set_floor_label(floor, &req.label)?;
    Ok(Json(FloorEntry {
        floor,
        label: graph.floor_label(floor).into_owned(),
    }))
}

// ============ Health ============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub nodes: usize,
    pub edges: usize,
    pub last_updated: u64,
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Server is healthy", body = HealthResponse)),
    tag = "map"
)]
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let graph = state.read();
    Json(HealthResponse {
        status: "ok".to_string(),
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        last_updated: graph.revision(),
    })
}

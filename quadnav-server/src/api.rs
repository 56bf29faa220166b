use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use quadnav_core::prelude::*;

pub fn router(map: Arc<CampusMap>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/places", get(list_places))
        .route("/api/route", post(find_route))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(ConcurrencyLimitLayer::new(64))
        .with_state(map)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Serialize)]
struct PlaceDto {
    id: String,
    name: String,
    x: f64,
    y: f64,
}

async fn list_places(State(map): State<Arc<CampusMap>>) -> Json<Vec<PlaceDto>> {
    let mut places: Vec<PlaceDto> = map
        .places()
        .map(|place| PlaceDto {
            id: place.id.to_string(),
            name: place.name.clone(),
            x: place.geometry.x(),
            y: place.geometry.y(),
        })
        .collect();
    places.sort_by(|a, b| a.name.cmp(&b.name));
    Json(places)
}

#[derive(Deserialize)]
struct RouteRequest {
    start: PlaceId,
    end: PlaceId,
}

#[derive(Serialize)]
struct RouteResponse {
    route: Route,
    steps: Vec<DirectionStep>,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

async fn find_route(
    State(map): State<Arc<CampusMap>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, (StatusCode, Json<ErrorBody>)> {
    match resolve_route(&map, &request.start, &request.end) {
        Ok(route) => {
            let steps = generate_directions(&route, map.places_by_id());
            Ok(Json(RouteResponse { route, steps }))
        }
        Err(err @ (Error::UnknownPlace(_) | Error::NoRoute { .. })) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                message: err.to_string(),
            }),
        )),
        Err(err) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                message: err.to_string(),
            }),
        )),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use geo::Point;
    use tower::ServiceExt;

    use super::*;

    fn sample_map() -> Arc<CampusMap> {
        let places = vec![
            Place {
                id: PlaceId::from(1),
                name: "Gate".to_string(),
                geometry: Point::new(0.0, 0.0),
            },
            Place {
                id: PlaceId::from(2),
                name: "Library".to_string(),
                geometry: Point::new(100.0, 0.0),
            },
            Place {
                id: PlaceId::from(3),
                name: "Hostel".to_string(),
                geometry: Point::new(100.0, 100.0),
            },
        ];
        let edges = vec![
            Edge {
                source: PlaceId::from(1),
                target: PlaceId::from(2),
                length: 100.0,
                geometry: None,
            },
            Edge {
                source: PlaceId::from(2),
                target: PlaceId::from(3),
                length: 100.0,
                geometry: None,
            },
        ];
        Arc::new(CampusMap::new(places, edges, Vec::new()))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = router(sample_map());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn places_are_listed_by_name() {
        let app = router(sample_map());
        let response = app
            .oneshot(Request::get("/api/places").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Gate", "Hostel", "Library"]);
    }

    #[tokio::test]
    async fn route_endpoint_returns_route_and_steps() {
        let app = router(sample_map());
        let response = app
            .oneshot(
                Request::post("/api/route")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"start": 1, "end": "3"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["route"]["length"], json!(200.0));
        assert_eq!(body["route"]["points"].as_array().unwrap().len(), 3);
        assert_eq!(body["steps"].as_array().unwrap().len(), 3);
        assert_eq!(body["steps"][1]["kind"], "turn");
    }

    #[tokio::test]
    async fn unknown_place_is_a_404_with_message() {
        let app = router(sample_map());
        let response = app
            .oneshot(
                Request::post("/api/route")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"start": 1, "end": 99}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("99"));
    }
}

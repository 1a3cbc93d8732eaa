// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: an in-memory Kubernetes API server behind a real kube `Client`.

use http::{Method, Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// Qualified resource names used as storage keys
pub const APP_REPOSITORIES: &str = "apprepositories.kubeapps.com";
pub const SECRETS: &str = "secrets";
pub const NAMESPACES: &str = "namespaces";
const ACCESS_REVIEWS: &str = "selfsubjectaccessreviews.authorization.k8s.io";

#[derive(Debug, Clone)]
struct StoredObject {
    resource: String,
    namespace: Option<String>,
    name: String,
    body: Value,
}

#[derive(Default)]
struct State {
    objects: Vec<StoredObject>,
    next_uid: u64,
    access_allowed: bool,
    last_access_review: Option<Value>,
    failures: HashMap<(String, String), u16>,
}

/// Parsed `/api/v1/...` or `/apis/<group>/<version>/...` path
struct Route {
    resource: String,
    namespace: Option<String>,
    name: Option<String>,
}

impl Route {
    fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let (group, rest) = match segments.as_slice() {
            ["api", _version, rest @ ..] => ("", rest),
            ["apis", group, _version, rest @ ..] => (*group, rest),
            _ => return None,
        };
        let (resource, namespace, name) = match rest {
            ["namespaces", ns, resource] => (*resource, Some(*ns), None),
            ["namespaces", ns, resource, name] => (*resource, Some(*ns), Some(*name)),
            [resource] => (*resource, None, None),
            [resource, name] => (*resource, None, Some(*name)),
            _ => return None,
        };
        let resource = if group.is_empty() {
            resource.to_string()
        } else {
            format!("{}.{}", resource, group)
        };
        Some(Route {
            resource,
            namespace: namespace.map(String::from),
            name: name.map(String::from),
        })
    }
}

fn status_json(code: u16, reason: &str, message: &str) -> String {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 404 not found response body
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

fn already_exists_json(resource: &str, name: &str) -> String {
    status_json(
        409,
        "AlreadyExists",
        &format!("{} \"{}\" already exists", resource, name),
    )
}

impl State {
    fn find(&self, resource: &str, namespace: Option<&str>, name: &str) -> Option<usize> {
        self.objects.iter().position(|o| {
            o.resource == resource && o.namespace.as_deref() == namespace && o.name == name
        })
    }

    fn insert(&mut self, resource: &str, namespace: Option<&str>, mut body: Value) -> Value {
        self.next_uid += 1;
        let name = body["metadata"]["name"].as_str().unwrap_or_default().to_string();
        if let Some(ns) = namespace {
            body["metadata"]["namespace"] = json!(ns);
        }
        body["metadata"]["uid"] = json!(format!("uid-{}", self.next_uid));
        self.objects.push(StoredObject {
            resource: resource.to_string(),
            namespace: namespace.map(String::from),
            name,
            body: body.clone(),
        });
        body
    }

    fn handle(&mut self, method: &Method, path: &str, body: &[u8]) -> (u16, String) {
        if let Some(code) = self.failures.get(&(method.to_string(), path.to_string())) {
            return (*code, status_json(*code, "Forbidden", "injected failure"));
        }

        let Some(route) = Route::parse(path) else {
            return (404, status_json(404, "NotFound", "the server could not find the requested resource"));
        };
        let namespace = route.namespace.as_deref();

        match (method.as_str(), route.name.as_deref()) {
            ("POST", None) if route.resource == ACCESS_REVIEWS => {
                let mut review: Value = serde_json::from_slice(body).unwrap_or_default();
                self.last_access_review = Some(review.clone());
                review["status"] = json!({
                    "allowed": self.access_allowed,
                    "reason": "answered by the fake API server"
                });
                (201, review.to_string())
            }
            ("POST", None) => {
                let Ok(object) = serde_json::from_slice::<Value>(body) else {
                    return (400, status_json(400, "BadRequest", "invalid body"));
                };
                let name = object["metadata"]["name"].as_str().unwrap_or_default().to_string();
                if self.find(&route.resource, namespace, &name).is_some() {
                    return (409, already_exists_json(&route.resource, &name));
                }
                let stored = self.insert(&route.resource, namespace, object);
                (201, stored.to_string())
            }
            ("GET", None) => {
                let items: Vec<Value> = self
                    .objects
                    .iter()
                    .filter(|o| o.resource == route.resource)
                    .filter(|o| namespace.is_none() || o.namespace.as_deref() == namespace)
                    .map(|o| o.body.clone())
                    .collect();
                let list = json!({
                    "apiVersion": "v1",
                    "kind": "List",
                    "metadata": {"resourceVersion": ""},
                    "items": items
                });
                (200, list.to_string())
            }
            ("GET", Some(name)) => match self.find(&route.resource, namespace, name) {
                Some(idx) => (200, self.objects[idx].body.to_string()),
                None => (404, not_found_json(&route.resource, name)),
            },
            ("DELETE", Some(name)) => match self.find(&route.resource, namespace, name) {
                Some(idx) => (200, self.objects.remove(idx).body.to_string()),
                None => (404, not_found_json(&route.resource, name)),
            },
            _ => (405, status_json(405, "MethodNotAllowed", "method not allowed")),
        }
    }
}

/// A stateful fake of the Kubernetes API server.
///
/// Objects are kept as JSON in insertion order. Creating an existing object
/// answers 409, reading or deleting a missing one answers 404, and every
/// created object gets a UID. Self subject access reviews are answered with
/// the value given to [`FakeApiServer::allow_access`].
#[derive(Clone, Default)]
pub struct FakeApiServer {
    state: Arc<Mutex<State>>,
}

impl FakeApiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object of `resource` (a qualified name such as [`SECRETS`])
    pub fn with_object(self, resource: &str, namespace: Option<&str>, body: Value) -> Self {
        self.state.lock().unwrap().insert(resource, namespace, body);
        self
    }

    pub fn with_namespace(self, name: &str) -> Self {
        self.with_object(
            NAMESPACES,
            None,
            json!({"apiVersion": "v1", "kind": "Namespace", "metadata": {"name": name}}),
        )
    }

    pub fn with_app_repository(self, namespace: &str, name: &str, private: bool) -> Self {
        let mut spec = json!({"type": "helm", "url": format!("https://charts.example.com/{}", name)});
        if private {
            spec["auth"] = json!({
                "header": {"secretKeyRef": {"name": format!("apprepo-{}", name), "key": "authorizationHeader"}}
            });
        }
        self.with_object(
            APP_REPOSITORIES,
            Some(namespace),
            json!({
                "apiVersion": "kubeapps.com/v1alpha1",
                "kind": "AppRepository",
                "metadata": {"name": name},
                "spec": spec
            }),
        )
    }

    pub fn with_secret(self, namespace: &str, name: &str) -> Self {
        self.with_object(
            SECRETS,
            Some(namespace),
            json!({"apiVersion": "v1", "kind": "Secret", "metadata": {"name": name}}),
        )
    }

    /// Answer for every self subject access review
    pub fn allow_access(self, allowed: bool) -> Self {
        self.state.lock().unwrap().access_allowed = allowed;
        self
    }

    /// Answer requests with `method` on exactly `path` with an error `status`
    pub fn fail_on(self, method: &str, path: &str, status: u16) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((method.to_string(), path.to_string()), status);
        self
    }

    pub fn get_object(&self, resource: &str, namespace: Option<&str>, name: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state
            .find(resource, namespace, name)
            .map(|idx| state.objects[idx].body.clone())
    }

    /// Number of stored objects of `resource` across all namespaces
    pub fn count(&self, resource: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.objects.iter().filter(|o| o.resource == resource).count()
    }

    pub fn last_access_review(&self) -> Option<Value> {
        self.state.lock().unwrap().last_access_review.clone()
    }

    /// Build a kube Client from this fake server
    pub fn into_client(self) -> Client {
        Client::new(self, "https://kubernetes.default.svc")
    }
}

impl Service<Request<Body>> for FakeApiServer {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let state = self.state.clone();

        Box::pin(async move {
            let method = req.method().clone();
            let path = req.uri().path().to_string();
            let body = req.into_body().collect().await?.to_bytes();

            let (status, body) = state.lock().unwrap().handle(&method, &path, &body);

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_parses_core_namespaced_object() {
        let route = Route::parse("/api/v1/namespaces/kubeapps/secrets/apprepo-x").unwrap();
        assert_eq!(route.resource, "secrets");
        assert_eq!(route.namespace.as_deref(), Some("kubeapps"));
        assert_eq!(route.name.as_deref(), Some("apprepo-x"));
    }

    #[test]
    fn test_route_parses_group_collection() {
        let route = Route::parse("/apis/kubeapps.com/v1alpha1/namespaces/ns/apprepositories").unwrap();
        assert_eq!(route.resource, APP_REPOSITORIES);
        assert_eq!(route.namespace.as_deref(), Some("ns"));
        assert!(route.name.is_none());
    }

    #[test]
    fn test_route_parses_cluster_scoped_object() {
        let route = Route::parse("/api/v1/namespaces/foo").unwrap();
        assert_eq!(route.resource, NAMESPACES);
        assert!(route.namespace.is_none());
        assert_eq!(route.name.as_deref(), Some("foo"));
    }
}

pub mod audit;

pub use campus_infra::request_id_middleware;

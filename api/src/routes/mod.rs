pub mod health_route;
pub mod question_answering_route;
pub mod sql_chain_route;

mod auth_test;
mod helpers;
mod list_test;
mod rating_test;
mod recommendation_test;
mod review_test;
mod router_test;
mod search_test;

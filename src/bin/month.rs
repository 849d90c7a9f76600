//! Fetches the task list and prints the current month as a calendar, plus the upcoming tasks.
//!
//! Expects `CORKBOARD_API_URL` and (optionally) `CORKBOARD_TOKEN` in the environment.

use corkboard::grid::{GridMonth, MonthGrid, Today};
use corkboard::index::{upcoming_tasks, DateIndex};
use corkboard::utils;
use corkboard::Client;

#[tokio::main]
async fn main() {
    env_logger::init();

    let base_url = std::env::var("CORKBOARD_API_URL")
        .unwrap_or_else(|_| String::from("http://localhost:8000/"));
    let mut client = Client::new(&base_url).unwrap();
    if let Ok(token) = std::env::var("CORKBOARD_TOKEN") {
        client.set_token(token);
    }

    let tasks = client.get_tasks().await.unwrap();
    let today = Today::capture();

    let index = DateIndex::build(&tasks);
    let grid = MonthGrid::build(GridMonth::current(), &index);
    utils::print_calendar(&grid, &index, &today);

    let upcoming = upcoming_tasks(&tasks, today.key());
    utils::print_task_list("Upcoming:", &upcoming);
}

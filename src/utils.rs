///! Some utility functions

use crate::grid::{MonthGrid, Today, DAY_NAMES};
use crate::index::DateIndex;
use crate::task::{priority_style, Task};

/// A debug utility that pretty-prints a task
pub fn print_task(task: &Task) {
    let completion = if task.completed() { "✓" } else { " " };
    let style = priority_style(Some(task.priority()));
    let due = task.due_key().map(|k| k.to_string()).unwrap_or_else(|| String::from("(undated)"));
    println!("    {} [{}] {}\t{}", completion, style.label, task.title(), due);
}

/// A debug utility that pretty-prints a list of tasks
pub fn print_task_list(title: &str, tasks: &[&Task]) {
    println!("{}", title);
    for task in tasks {
        print_task(task);
    }
}

/// A debug utility that renders a month grid on the console.
///
/// One line per week; filler days are parenthesized, today is marked with `*`, and days with
/// tasks show their count.
pub fn print_month_grid(grid: &MonthGrid, today: &Today) {
    println!("{} {}", grid.month().name(), grid.month().year());
    for day_name in &DAY_NAMES {
        print!("  {}  ", day_name);
    }
    println!();

    for week in grid.cells().chunks(7) {
        for cell in week {
            let date = cell.date();
            let marker = if today.contains(&date) { "*" } else { " " };
            let count = if cell.task_count() > 0 {
                format!("{}", cell.task_count())
            } else {
                String::from(" ")
            };
            if cell.in_current_month() {
                print!(" {:>2}{}{} ", date.day, marker, count);
            } else {
                print!("({:>2}){} ", date.day, count);
            }
        }
        println!();
    }
}

/// Print the whole calendar view: the grid plus the tasks due on the selected day
pub fn print_calendar(grid: &MonthGrid, index: &DateIndex, today: &Today) {
    print_month_grid(grid, today);

    let due_today = index.tasks_on(&today.key());
    if due_today.is_empty() {
        println!("Nothing due today");
    } else {
        print_task_list("Due today:", due_today);
    }
}

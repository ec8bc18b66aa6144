use crate::layout::{MONTH_LABELS, WEEKDAY_LABELS, month_columns};
use crate::models::{GridYear, YearGrid};
use maud::html;
use std::fmt::Write;

pub fn render_index(year: GridYear, grid: &YearGrid) -> String {
    INDEX_HTML
        .replace("{{YEAR}}", &year.to_string())
        .replace("{{MONTHS}}", &month_header(year))
        .replace("{{WEEKDAYS}}", &weekday_labels())
        .replace("{{CELLS}}", &cells(grid))
}

pub fn render_loading() -> String {
    LOADING_HTML.to_string()
}

fn month_header(year: GridYear) -> String {
    let mut html = String::new();
    for (label, column) in MONTH_LABELS.iter().zip(month_columns(year)) {
        let _ = write!(
            html,
            r#"<span class="month" style="grid-column: {}">{label}</span>"#,
            column + 1
        );
    }
    html
}

fn weekday_labels() -> String {
    WEEKDAY_LABELS
        .iter()
        .map(|label| format!(r#"<span class="weekday">{label}</span>"#))
        .collect()
}

fn cells(grid: &YearGrid) -> String {
    let markup = html! {
        @for (index, slot) in grid.slots().iter().enumerate() {
            @match slot {
                None => { div.cell.pad {} }
                Some(cell) => {
                    form method="post" action={ "/toggle/" (index) } {
                        button.cell.done[cell.is_checked]
                            type="submit"
                            data-index=(index)
                            title=(cell.date)
                            aria-label=(cell.date)
                            aria-pressed=(if cell.is_checked { "true" } else { "false" }) {}
                    }
                }
            }
        }
    };
    markup.into_string()
}

const LOADING_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta http-equiv="refresh" content="1" />
  <title>Habit Grid</title>
</head>
<body>
  <div>Loading</div>
</body>
</html>
"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Grid {{YEAR}}</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --empty: #eff6ff;
      --done: #86efac;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
      --cell: 18px;
      --gap: 2px;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 40px 18px 48px;
    }

    .app {
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 20px;
      overflow-x: auto;
      max-width: 100%;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: 1.6rem;
      text-align: center;
      margin: 0;
    }

    .calendar {
      display: grid;
      grid-template-columns: auto auto;
      gap: 6px 8px;
      border: 1px solid black;
      border-radius: 2px;
      padding: 10px;
    }

    .months {
      grid-column: 2;
      display: grid;
      grid-template-columns: repeat(53, var(--cell));
      column-gap: var(--gap);
      font-size: 0.75rem;
    }

    .weekdays {
      display: grid;
      grid-template-rows: repeat(7, var(--cell));
      row-gap: var(--gap);
      font-size: 0.7rem;
      color: #8b857d;
      align-items: center;
    }

    .grid {
      display: grid;
      grid-auto-flow: column;
      grid-template-rows: repeat(7, var(--cell));
      grid-auto-columns: var(--cell);
      gap: var(--gap);
    }

    .grid form {
      margin: 0;
    }

    .cell {
      appearance: none;
      display: block;
      width: var(--cell);
      height: var(--cell);
      padding: 0;
      border: none;
      background: var(--empty);
      cursor: pointer;
    }

    .cell.pad {
      background: transparent;
      cursor: default;
    }

    .cell.done {
      background: var(--done);
    }

    .cell:hover:not(.pad) {
      outline: 1px solid var(--ink);
    }
  </style>
</head>
<body>
  <main class="app">
    <h1>{{YEAR}}</h1>
    <section class="calendar">
      <div class="months">{{MONTHS}}</div>
      <div class="weekdays">{{WEEKDAYS}}</div>
      <div class="grid" id="grid">{{CELLS}}</div>
    </section>
  </main>

  <script>
    const grid = document.getElementById('grid');

    grid.addEventListener('submit', async (event) => {
      event.preventDefault();
      const button = event.target.querySelector('button');
      const index = Number(button.dataset.index);

      try {
        const res = await fetch('/api/toggle', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({ index })
        });
        if (!res.ok) {
          throw new Error(await res.text());
        }
        const { cell } = await res.json();
        if (cell) {
          button.classList.toggle('done', cell.isChecked);
          button.setAttribute('aria-pressed', String(cell.isChecked));
        }
      } catch (err) {
        console.error(err);
      }
    });
  </script>
</body>
</html>
"#;

use minegrid::{Cell, GameError, GameState, Grid, Position};
use std::io::{self, Write};

fn main() {
    match run() {
        Ok(_) => println!("Thanks for playing!"),
        Err(e) => eprintln!("Game error: {}", e),
    }
}

fn run() -> Result<(), GameError> {
    loop {
        run_game()?;
        if !ask_yes_no("Play again? [y/n]: ") {
            return Ok(());
        }
    }
}

fn run_game() -> Result<(), GameError> {
    // A restart builds a fresh grid; nothing carries over.
    let mut grid = Grid::new(10, 10, 10)?;

    while grid.state() == GameState::Playing {
        print_board(&grid);
        println!("Mines remaining: {}", grid.mines_remaining());

        if let Some((pos, action)) = get_user_input() {
            match action {
                'r' => {
                    grid.reveal(pos);
                }
                'f' => {
                    let _ = grid.toggle_flag(pos);
                }
                _ => unreachable!(),
            }
        }
    }

    print_board(&grid);
    match grid.state() {
        GameState::Won => println!("Congratulations! You won!"),
        GameState::Lost => println!("Game Over!"),
        GameState::Playing => unreachable!(),
    }

    Ok(())
}

fn print_board(grid: &Grid) {
    let (width, height) = grid.dimensions();

    // Print column numbers
    print!("  ");
    for x in 0..width {
        print!("{} ", x);
    }
    println!();

    // Print rows
    for y in 0..height {
        print!("{} ", y);
        for x in 0..width {
            let pos = Position::new(x as i32, y as i32);
            if let Some(cell) = grid.cell(pos) {
                print_cell(grid, cell, pos);
            }
        }
        println!();
    }
}

fn print_cell(grid: &Grid, cell: &Cell, pos: Position) {
    if cell.is_covered() {
        if cell.is_flagged() {
            print!("⚑ ");
        } else {
            print!("□ ");
        }
    } else if cell.is_mine() {
        // Revealed mines only show up once the game is lost; the flag stays
        // visible on correctly flagged ones.
        if cell.is_flagged() {
            print!("⚑ ");
        } else {
            print!("* ");
        }
    } else {
        match grid.adjacent_mines(pos) {
            0 => print!("  "),
            n => print!("{} ", n),
        }
    }
}

fn get_user_input() -> Option<(Position, char)> {
    print!("Enter command (x y [r/f]): ");
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input).ok()?;

    let mut parts = input.split_whitespace();

    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    let action = parts.next()?.chars().next()?;

    if action != 'r' && action != 'f' {
        println!("Invalid action. Use 'r' to reveal or 'f' to flag");
        return None;
    }

    Some((Position::new(x, y), action))
}

fn ask_yes_no(prompt: &str) -> bool {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim(), "y" | "Y" | "yes")
}

//! The tape machine that executes a parsed instruction tree.

use std::collections::VecDeque;

use crate::error::InterpreterError;
use crate::parser::Instr;

/// Number of addressable tape cells when no capacity is configured.
pub const DEFAULT_TAPE_CAPACITY: usize = 100;

/// One run's worth of interpreter state.
///
/// A `Machine` owns its tape, pointer, input queue and output accumulator
/// exclusively; nothing is shared between runs, so concurrent runs are
/// independent by construction. The tape starts as a single zeroed cell
/// and grows lazily as `>` first visits a position, up to `capacity`
/// cells (valid indices `0..=capacity - 1`).
pub struct Machine {
    tape: Vec<u8>,
    pointer: usize,
    capacity: usize,
    input: VecDeque<u8>,
    output: String,
    trace: bool,
    steps: usize,
}

impl Machine {
    /// Create a machine with `capacity` addressable cells and a queue of
    /// pre-supplied input values for `,` to consume.
    ///
    /// A capacity of 0 would leave even the origin cell unaddressable, so
    /// capacity is clamped to at least 1.
    pub fn new(capacity: usize, input: Vec<u8>) -> Self {
        Self {
            tape: vec![0],
            pointer: 0,
            capacity: capacity.max(1),
            input: VecDeque::from(input),
            output: String::new(),
            trace: false,
            steps: 0,
        }
    }

    /// Execute `program` to completion, consuming the machine.
    ///
    /// Returns the accumulated output (possibly empty) on success, or the
    /// first error encountered. Once an error occurs no further cell,
    /// pointer or output mutation happens.
    pub fn run(mut self, program: &[Instr]) -> Result<String, InterpreterError> {
        self.walk(program)?;
        Ok(self.output)
    }

    /// Execute `program` while printing a step-by-step table of operations
    /// to stdout. State advances exactly as in [`Machine::run`], including
    /// input-queue consumption; the accumulated output is still returned so
    /// callers can decide whether to show it.
    pub fn run_traced(mut self, program: &[Instr]) -> Result<String, InterpreterError> {
        self.trace = true;
        println!("STEP | PTR | CELL | OP | ACTION");
        println!("-----+-----+------+----+------------------------------------------------");
        self.walk(program)?;
        Ok(self.output)
    }

    /// In-order walk of an instruction sequence, recursing into loop
    /// bodies. A loop body always runs before its guard cell is read, and
    /// repeats until the guard reads zero.
    fn walk(&mut self, program: &[Instr]) -> Result<(), InterpreterError> {
        for instr in program {
            let (ptr, cell) = (self.pointer, self.cell());
            match instr {
                Instr::Inc => {
                    if cell == u8::MAX {
                        return Err(InterpreterError::ValueOutOfRange { ptr, op: '+' });
                    }
                    self.tape[ptr] += 1;
                    if self.trace {
                        self.row(ptr, cell, '+', &format!("Increment cell[{ptr}] from {cell} to {}", cell + 1));
                    }
                }
                Instr::Dec => {
                    if cell == 0 {
                        return Err(InterpreterError::ValueOutOfRange { ptr, op: '-' });
                    }
                    self.tape[ptr] -= 1;
                    if self.trace {
                        self.row(ptr, cell, '-', &format!("Decrement cell[{ptr}] from {cell} to {}", cell - 1));
                    }
                }
                Instr::Output => {
                    let ch = cell as char;
                    self.output.push(ch);
                    if self.trace {
                        self.row(ptr, cell, '.', &format!("Append {ch:?} to output"));
                    }
                }
                Instr::Input => match self.input.pop_front() {
                    Some(value) => {
                        self.tape[ptr] = value;
                        if self.trace {
                            self.row(ptr, cell, ',', &format!("Read {value} from the input queue"));
                        }
                    }
                    None => {
                        // Exhausted queue reads 0, like EOF.
                        self.tape[ptr] = 0;
                        if self.trace {
                            self.row(ptr, cell, ',', "Input queue empty; cell set to 0");
                        }
                    }
                },
                Instr::Right => {
                    if ptr + 1 >= self.capacity {
                        return Err(InterpreterError::PointerOutOfBounds { ptr, op: '>' });
                    }
                    self.pointer += 1;
                    if self.pointer == self.tape.len() {
                        // First visit to this position.
                        self.tape.push(0);
                    }
                    if self.trace {
                        self.row(ptr, cell, '>', &format!("Move pointer to index {}", ptr + 1));
                    }
                }
                Instr::Left => {
                    if ptr == 0 {
                        return Err(InterpreterError::PointerOutOfBounds { ptr, op: '<' });
                    }
                    self.pointer -= 1;
                    if self.trace {
                        self.row(ptr, cell, '<', &format!("Move pointer to index {}", ptr - 1));
                    }
                }
                Instr::Loop(body) => {
                    if self.trace {
                        self.row(ptr, cell, '[', "Enter loop; the body runs before the guard is read");
                    }
                    loop {
                        self.walk(body)?;
                        let guard = self.cell();
                        if self.trace {
                            let action = if guard == 0 {
                                "Guard cell is 0; exit loop".to_string()
                            } else {
                                format!("Guard cell is {guard}; repeat body")
                            };
                            self.row(self.pointer, guard, ']', &action);
                        }
                        if guard == 0 {
                            break;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn cell(&self) -> u8 {
        self.tape[self.pointer]
    }

    fn row(&mut self, ptr: usize, cell: u8, op: char, action: &str) {
        println!("{:<4} | {:<3} | {:<4} |  {}  | {}", self.steps, ptr, cell, op, action);
        self.steps += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn run(source: &str, input: Vec<u8>) -> Result<String, InterpreterError> {
        Machine::new(DEFAULT_TAPE_CAPACITY, input).run(&parse(source).unwrap())
    }

    #[test]
    fn increments_then_outputs_the_code_point() {
        assert_eq!(run("+++.", vec![]).unwrap(), "\u{3}");
    }

    #[test]
    fn empty_program_produces_empty_output() {
        assert_eq!(run("", vec![]).unwrap(), "");
    }

    #[test]
    fn input_is_consumed_in_order() {
        assert_eq!(run(",.", vec![65]).unwrap(), "A");
        assert_eq!(run(",.>,.", vec![72, 105]).unwrap(), "Hi");
    }

    #[test]
    fn exhausted_input_queue_reads_zero() {
        // One queued value, two reads: the second read writes 0 over 65.
        assert_eq!(run(",,.", vec![65]).unwrap(), "\u{0}");
        assert_eq!(run(",.", vec![]).unwrap(), "\u{0}");
    }

    #[test]
    fn loop_body_runs_before_the_guard_is_read() {
        // With a zero guard cell, conventional semantics would skip the
        // body entirely; here the body runs once and the decrement of a
        // zero cell is a value error.
        let result = run("[-]", vec![]);
        assert_eq!(
            result,
            Err(InterpreterError::ValueOutOfRange { ptr: 0, op: '-' })
        );
    }

    #[test]
    fn loop_terminates_when_the_guard_reaches_zero() {
        assert_eq!(run("+++[-]", vec![]).unwrap(), "");
    }

    #[test]
    fn nested_loops_transfer_a_value() {
        // Move 3 from cell 0 to cell 1, then print cell 1.
        assert_eq!(run("+++[>+<-]>.", vec![]).unwrap(), "\u{3}");
    }

    #[test]
    fn increment_past_255_is_a_value_error_with_no_output() {
        let source = "+".repeat(256);
        let result = run(&source, vec![]);
        assert_eq!(
            result,
            Err(InterpreterError::ValueOutOfRange { ptr: 0, op: '+' })
        );

        // 255 increments alone are fine.
        assert_eq!(run(&"+".repeat(255), vec![]).unwrap(), "");
    }

    #[test]
    fn decrement_below_zero_is_a_value_error() {
        let result = run("-", vec![]);
        assert_eq!(
            result,
            Err(InterpreterError::ValueOutOfRange { ptr: 0, op: '-' })
        );
    }

    #[test]
    fn moving_left_from_the_origin_is_a_bounds_error() {
        let result = run("<", vec![]);
        assert_eq!(
            result,
            Err(InterpreterError::PointerOutOfBounds { ptr: 0, op: '<' })
        );
    }

    #[test]
    fn moving_right_to_the_capacity_edge_is_a_bounds_error() {
        // With capacity cells the pointer may reach index capacity - 1;
        // the capacity'th '>' crosses the edge.
        let capacity = 5;
        let ok = ">".repeat(capacity - 1);
        let machine = Machine::new(capacity, vec![]);
        assert!(machine.run(&parse(&ok).unwrap()).is_ok());

        let over = ">".repeat(capacity);
        let machine = Machine::new(capacity, vec![]);
        assert_eq!(
            machine.run(&parse(&over).unwrap()),
            Err(InterpreterError::PointerOutOfBounds {
                ptr: capacity - 1,
                op: '>',
            })
        );
    }

    #[test]
    fn error_discards_output_accumulated_before_it() {
        // '.' runs before the failing '<'; the run reports only the error.
        let result = run("+.<", vec![]);
        assert_eq!(
            result,
            Err(InterpreterError::PointerOutOfBounds { ptr: 0, op: '<' })
        );
    }

    #[test]
    fn tape_grows_only_as_positions_are_visited() {
        let program = parse(">>").unwrap();
        let mut machine = Machine::new(10, vec![]);
        machine.walk(&program).unwrap();
        assert_eq!(machine.tape.len(), 3);
        assert_eq!(machine.pointer, 2);

        // Revisiting does not grow the tape again.
        machine.walk(&parse("<<>>").unwrap()).unwrap();
        assert_eq!(machine.tape.len(), 3);
    }

    #[test]
    fn newly_grown_cells_start_at_zero() {
        assert_eq!(run(">.", vec![]).unwrap(), "\u{0}");
    }

    #[test]
    fn zero_capacity_is_clamped_to_one_cell() {
        let machine = Machine::new(0, vec![]);
        assert_eq!(machine.run(&parse("+.").unwrap()).unwrap(), "\u{1}");
    }

    #[test]
    fn traced_run_matches_plain_run_state() {
        let program = parse("++[>+<-]>.").unwrap();
        let plain = Machine::new(10, vec![]).run(&program).unwrap();
        let traced = Machine::new(10, vec![]).run_traced(&program).unwrap();
        assert_eq!(plain, traced);
    }
}

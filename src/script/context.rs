//! Virtual machine state for one script evaluation

use super::conditional::ConditionalStack;
use super::number::{decode_bool, decode_num, encode_bool, encode_num};
use super::{RuleFlags, ScriptError, SigVersion, MAX_OPS_PER_SCRIPT, MAX_STACK_SIZE};
use crate::result::{Error, Result};

// Stack capacity defaults, which may exceeded
const STACK_CAPACITY: usize = 100;
const ALT_STACK_CAPACITY: usize = 10;

/// Main stack, alt stack, open conditionals and operation count of an evaluation
///
/// Deliberately not `Clone`. A later pass that needs the stack builds a new context from a copy
/// of it with [`EvaluationContext::with_stack`].
#[derive(Debug)]
pub struct EvaluationContext {
    stack: Vec<Vec<u8>>,
    alt_stack: Vec<Vec<u8>>,
    conditions: ConditionalStack,
    op_count: usize,
    flags: RuleFlags,
    version: SigVersion,
}

impl EvaluationContext {
    /// Creates a context with empty stacks
    pub fn new(flags: RuleFlags, version: SigVersion) -> EvaluationContext {
        EvaluationContext::with_stack(Vec::with_capacity(STACK_CAPACITY), flags, version)
    }

    /// Creates a context whose main stack starts as `stack`
    pub fn with_stack(
        stack: Vec<Vec<u8>>,
        flags: RuleFlags,
        version: SigVersion,
    ) -> EvaluationContext {
        EvaluationContext {
            stack,
            alt_stack: Vec::with_capacity(ALT_STACK_CAPACITY),
            conditions: ConditionalStack::new(),
            op_count: 0,
            flags,
            version,
        }
    }

    pub fn flags(&self) -> RuleFlags {
        self.flags
    }

    pub fn version(&self) -> SigVersion {
        self.version
    }

    /// Main stack, bottom first
    pub fn stack(&self) -> &[Vec<u8>] {
        &self.stack
    }

    /// Consumes the context, returning its main stack
    pub fn into_stack(self) -> Vec<Vec<u8>> {
        self.stack
    }

    /// Number of elements on the main stack
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    // ----------------------------------------------------------------------------------------
    // Main stack
    // ----------------------------------------------------------------------------------------

    pub fn push(&mut self, item: Vec<u8>) {
        self.stack.push(item);
    }

    pub fn push_bool(&mut self, b: bool) {
        self.stack.push(encode_bool(b));
    }

    pub fn push_num(&mut self, n: i64) {
        self.stack.push(encode_num(n));
    }

    /// Fails unless the main stack has at least `n` elements
    #[inline]
    pub fn require(&self, n: usize) -> Result<()> {
        if self.stack.len() < n {
            return Err(Error::ScriptError(ScriptError::InvalidStackOperation));
        }
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Vec<u8>> {
        self.stack
            .pop()
            .ok_or(Error::ScriptError(ScriptError::InvalidStackOperation))
    }

    /// Pops a bool off the stack
    pub fn pop_bool(&mut self) -> Result<bool> {
        Ok(decode_bool(&self.pop()?))
    }

    /// Pops a number of at most `max_size` bytes, minimally encoded under MINIMALDATA
    pub fn pop_num(&mut self, max_size: usize) -> Result<i64> {
        let top = self.pop()?;
        decode_num(&top, max_size, self.flags.contains(RuleFlags::MINIMALDATA))
    }

    /// Returns the element `depth` positions below the top, where 0 is the top
    pub fn peek(&self, depth: usize) -> Result<&Vec<u8>> {
        self.require(depth + 1)?;
        Ok(&self.stack[self.stack.len() - 1 - depth])
    }

    pub fn peek_bool(&self, depth: usize) -> Result<bool> {
        Ok(decode_bool(self.peek(depth)?))
    }

    /// Reads the element at `depth` as a number without popping it
    pub fn peek_num(&self, depth: usize, max_size: usize) -> Result<i64> {
        let require_minimal = self.flags.contains(RuleFlags::MINIMALDATA);
        decode_num(self.peek(depth)?, max_size, require_minimal)
    }

    /// Swaps the elements at two depths
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.require(a.max(b) + 1)?;
        let len = self.stack.len();
        self.stack.swap(len - 1 - a, len - 1 - b);
        Ok(())
    }

    /// Removes and returns the element at `depth`
    pub fn erase(&mut self, depth: usize) -> Result<Vec<u8>> {
        self.require(depth + 1)?;
        let index = self.stack.len() - 1 - depth;
        Ok(self.stack.remove(index))
    }

    /// Inserts an element so that it ends up at `depth`
    pub fn insert(&mut self, depth: usize, item: Vec<u8>) -> Result<()> {
        self.require(depth)?;
        let index = self.stack.len() - depth;
        self.stack.insert(index, item);
        Ok(())
    }

    // ----------------------------------------------------------------------------------------
    // Alt stack
    // ----------------------------------------------------------------------------------------

    /// Moves the top of the main stack to the alt stack
    pub fn to_alt(&mut self) -> Result<()> {
        let top = self.pop()?;
        self.alt_stack.push(top);
        Ok(())
    }

    /// Moves the top of the alt stack to the main stack
    pub fn from_alt(&mut self) -> Result<()> {
        let top = self
            .alt_stack
            .pop()
            .ok_or(Error::ScriptError(ScriptError::InvalidAltstackOperation))?;
        self.stack.push(top);
        Ok(())
    }

    pub fn alt_len(&self) -> usize {
        self.alt_stack.len()
    }

    // ----------------------------------------------------------------------------------------
    // Conditionals
    // ----------------------------------------------------------------------------------------

    /// Returns whether the current operation executes
    pub fn executing(&self) -> bool {
        self.conditions.succeeded()
    }

    pub fn conditions(&self) -> &ConditionalStack {
        &self.conditions
    }

    pub fn conditions_mut(&mut self) -> &mut ConditionalStack {
        &mut self.conditions
    }

    // ----------------------------------------------------------------------------------------
    // Limits
    // ----------------------------------------------------------------------------------------

    /// Counts `n` operations, failing past MAX_OPS_PER_SCRIPT
    pub fn count_ops(&mut self, n: usize) -> Result<()> {
        self.op_count += n;
        if self.op_count > MAX_OPS_PER_SCRIPT {
            return Err(Error::ScriptError(ScriptError::OpCount));
        }
        Ok(())
    }

    pub fn op_count(&self) -> usize {
        self.op_count
    }

    /// Fails if the main and alt stacks together exceed MAX_STACK_SIZE
    pub fn check_stack_size(&self) -> Result<()> {
        if self.stack.len() + self.alt_stack.len() > MAX_STACK_SIZE {
            return Err(Error::ScriptError(ScriptError::StackSize));
        }
        Ok(())
    }
}

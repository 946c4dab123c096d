// Copyright (c) 2017 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0
//
// Subject to the condition set forth below, permission is hereby granted to any person obtaining a
// copy of this software, associated documentation and/or data (collectively the "Software"), free
// of charge and under any and all copyright rights in the Software, and any and all patent rights
// owned or freely licensable by each licensor hereunder covering either (i) the unmodified
// Software as contributed to or provided by such licensor, or (ii) the Larger Works (as defined
// below), to deal in both
//
// (a) the Software, and
// (b) any piece of software and/or hardware listed in the lrgrwrks.txt file
// if one is included with the Software (each a "Larger Work" to which the Software is contributed
// by such licensors),
//
// without restriction, including without limitation the rights to copy, create derivative works
// of, display, perform, and distribute the Software and make, use, sell, offer for sale, import,
// export, have made, and have sold the Software and the Larger Work(s), and to sublicense the
// foregoing rights on either these or other terms.
//
// This license is subject to the following condition: The above copyright notice and either this
// complete permission notice or at a minimum a reference to the UPL must be included in all copies
// or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Tokeniser, grammar-directed tree builder, semantic-diff merger, orderer and serialiser
//! for the `scr`/`def`/`loot`/`varlist` script dialects.
//!
//! The pipeline, leaves first: [`lexer`] (character classifiers and a shared scanner),
//! [`signature`] (per-construct canonicalisation), [`builder`] (dialect-specific tree
//! construction), [`merger`] (diff/target matching and edit application), [`orderer`]
//! (insert-first-then-target-order ranking within a kind), [`serializer`] (deterministic
//! text rendering). [`parser::Parser`] wires all of these together behind the `SetDiff` /
//! `SetTarget` / `Parse` / `Reset` lifecycle described in the design.

pub mod builder;
pub mod error;
pub mod flags;
pub mod lexer;
pub mod merger;
pub mod node;
pub mod orderer;
pub mod parser;
pub mod serializer;
pub mod signature;

pub use builder::FileType;
pub use error::{ParseError, ParseResult};
pub use flags::Flag;
pub use node::Node;
pub use parser::{Parser, SharedParser};

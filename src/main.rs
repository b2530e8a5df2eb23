// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use taxseq::errors::TaxseqError;

fn main() -> Result<(), TaxseqError> {
    taxseq::run()
}

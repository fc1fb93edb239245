// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the sss-recover project.
// See the LICENSE file in the project root for full license information.

//! This module contains the point type and the interpolation routines over it.
pub mod lagrange;
pub mod point;

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供错误类型与遥测初始化等通用辅助功能
pub mod errors;
pub mod telemetry;

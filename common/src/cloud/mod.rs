// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

mod cloudconfig;
mod cloudpublisher;
mod publisher;

pub use cloudconfig::CloudConfig;
pub use cloudpublisher::CloudPublisher;
pub use publisher::Publisher;
